use super::*;

fn financial_frame() -> Frame {
    Frame::from_rows(
        &["transaction_id", "amount", "merchant", "timestamp", "notes"],
        &[
            &["t1", "100", "acme", "2024-01-01 10:00:00", "ok"],
            &["t2", "250.5", "globex", "2024-01-01 11:00:00", "ok"],
            &["t3", "80", "initech", "2024-01-01 12:00:00", ""],
        ],
    )
}

// ── detect_file_type ────────────────────────────────────────────────

#[test]
fn detects_financial_from_indicators() {
    let (kind, confidence) = detect_file_type(&financial_frame());
    assert_eq!(kind, FileKind::Financial);
    // transaction_id + amount + merchant = 3 indicators x 2 points.
    assert_eq!(confidence, 0.6);
}

#[test]
fn detects_inventory_from_quantity_columns() {
    let frame = Frame::from_rows(&["quantity", "item_name"], &[&["5", "widget"]]);
    let (kind, _) = detect_file_type(&frame);
    assert_eq!(kind, FileKind::Inventory);
}

#[test]
fn detects_security_logs_with_heuristics() {
    let frame = Frame::from_rows(
        &["log_id", "login_time", "source_ip"],
        &[&["1", "2024-01-01", "10.0.0.1"]],
    );
    let (kind, confidence) = detect_file_type(&frame);
    assert_eq!(kind, FileKind::SecurityLogs);
    // log_id + source_ip primary, login heuristic: 2 + 2 + 1 = 5.
    assert_eq!(confidence, 0.5);
}

#[test]
fn detection_is_deterministic_for_a_column_set() {
    let frame = financial_frame();
    let first = detect_file_type(&frame);
    for _ in 0..5 {
        assert_eq!(detect_file_type(&frame), first);
    }
}

#[test]
fn tie_breaks_by_declared_precedence() {
    // quantity (inventory) and merchant (financial) score 2 each;
    // inventory is declared first and must win.
    let frame = Frame::from_rows(&["quantity", "merchant"], &[&["1", "acme"]]);
    let (kind, _) = detect_file_type(&frame);
    assert_eq!(kind, FileKind::Inventory);
}

#[test]
fn column_names_are_lowercased_and_trimmed() {
    let frame = Frame::from_rows(&[" Amount ", "MERCHANT"], &[&["5", "acme"]]);
    let (kind, confidence) = detect_file_type(&frame);
    assert_eq!(kind, FileKind::Financial);
    assert_eq!(confidence, 0.4);
}

// ── canonicalize ────────────────────────────────────────────────────

#[test]
fn maps_columns_and_preserves_row_count() {
    let frame = financial_frame();
    let (canonical, metadata) = canonicalize(&frame);

    assert_eq!(canonical.row_count(), 3);
    assert_eq!(metadata.row_count, 3);
    assert_eq!(metadata.file_type, Some(FileKind::Financial));
    assert_eq!(
        metadata.detected_schema.get("transaction_id"),
        Some(&"id".to_string())
    );
    assert_eq!(
        metadata.detected_schema.get("amount"),
        Some(&"amount".to_string())
    );
    assert!(metadata.has_timestamp);
    assert!(metadata.has_amount);
    assert!(!metadata.has_user_id);
}

#[test]
fn first_alias_wins() {
    // Both "amount" and "value" are financial aliases for the canonical
    // amount field; "amount" comes first in the alias list.
    let frame = Frame::from_rows(
        &["amount", "value", "merchant"],
        &[&["1", "999", "acme"], &["2", "999", "acme"]],
    );
    let (canonical, metadata) = canonicalize(&frame);
    assert_eq!(canonical.column_f64s("amount"), vec![1.0, 2.0]);
    assert_eq!(metadata.detected_schema.get("amount"), Some(&"amount".to_string()));
    // "value" was not consumed and survives as a raw column.
    assert!(canonical.has_column("raw_value"));
}

#[test]
fn unmapped_columns_survive_with_raw_prefix() {
    let (canonical, _) = canonicalize(&financial_frame());
    assert!(canonical.has_column("raw_notes"));
    assert_eq!(canonical.column("raw_notes").unwrap().len(), 3);
}

#[test]
fn unmatched_canonical_fields_become_null_columns() {
    let (canonical, _) = canonicalize(&financial_frame());
    assert!(canonical.has_column("ip_address"));
    assert_eq!(canonical.non_null_count("ip_address"), 0);
}

#[test]
fn security_logs_without_amount_field_do_not_fault() {
    let frame = Frame::from_rows(
        &["log_id", "user_agent", "source_ip", "action"],
        &[&["1", "curl", "10.0.0.1", "login"]],
    );
    let (canonical, metadata) = canonicalize(&frame);
    assert_eq!(metadata.file_type, Some(FileKind::SecurityLogs));
    assert!(!metadata.has_amount);
    assert!(!canonical.has_column("amount"));
}

#[test]
fn empty_frame_canonicalizes_cleanly() {
    let frame = Frame::from_rows(&["amount", "merchant"], &[]);
    let (canonical, metadata) = canonicalize(&frame);
    assert_eq!(canonical.row_count(), 0);
    assert_eq!(metadata.row_count, 0);
    assert_eq!(metadata.risk_score, 0.0);
}

// ── intake risk ─────────────────────────────────────────────────────

#[test]
fn negative_amounts_raise_risk() {
    let clean = Frame::from_rows(
        &["amount", "merchant"],
        &[&["10", "a"], &["20", "b"], &["30", "c"], &["40", "d"]],
    );
    let dirty = Frame::from_rows(
        &["amount", "merchant"],
        &[&["10", "a"], &["-20", "b"], &["-30", "c"], &["40", "d"]],
    );
    let (_, clean_meta) = canonicalize(&clean);
    let (_, dirty_meta) = canonicalize(&dirty);
    assert!(dirty_meta.risk_score > clean_meta.risk_score);
}

#[test]
fn negative_amount_contribution_is_capped() {
    // Every row negative: the negative term is min(1.0, 0.2) = 0.2. With
    // all amounts equal, max == p99 and the outlier term fires too.
    let rows: Vec<Vec<&str>> = (0..10).map(|_| vec!["-5", "a"]).collect();
    let refs: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let all_neg = Frame::from_rows(&["amount", "merchant"], &refs);
    let (canonical, meta) = canonicalize(&all_neg);
    let missing_term = canonical.null_cell_count() as f64 / canonical.cell_count() as f64 * 0.3;
    assert!((meta.risk_score - (missing_term + 0.2 + 0.1)).abs() < 1e-9);
}

#[test]
fn extreme_outlier_amount_raises_risk() {
    // 100 flat rows put the 99th percentile on the flat value, so a single
    // huge amount exceeds p99 x 10.
    let mut rows: Vec<Vec<&str>> = (0..100).map(|_| vec!["10", "a"]).collect();
    rows.push(vec!["100000", "a"]);
    let refs: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let frame = Frame::from_rows(&["amount", "merchant"], &refs);
    let baseline = Frame::from_rows(&["amount", "merchant"], &refs[..100]);

    let (_, outlier_meta) = canonicalize(&frame);
    let (_, baseline_meta) = canonicalize(&baseline);
    assert!(outlier_meta.risk_score > baseline_meta.risk_score);
}

#[test]
fn unparseable_timestamps_raise_risk() {
    let good = Frame::from_rows(
        &["amount", "merchant", "timestamp"],
        &[&["10", "a", "2024-01-01"], &["20", "b", "2024-01-02"]],
    );
    let bad = Frame::from_rows(
        &["amount", "merchant", "timestamp"],
        &[&["10", "a", "yesterday-ish"], &["20", "b", "2024-01-02"]],
    );
    let (_, good_meta) = canonicalize(&good);
    let (_, bad_meta) = canonicalize(&bad);
    assert!((bad_meta.risk_score - good_meta.risk_score - 0.2).abs() < 1e-9);
}

#[test]
fn negative_inventory_quantity_raises_risk() {
    let frame = Frame::from_rows(
        &["quantity", "item_name"],
        &[&["5", "widget"], &["-2", "gizmo"]],
    );
    let (_, metadata) = canonicalize(&frame);
    assert_eq!(metadata.file_type, Some(FileKind::Inventory));
    let comparable = Frame::from_rows(
        &["quantity", "item_name"],
        &[&["5", "widget"], &["2", "gizmo"]],
    );
    let (_, clean_meta) = canonicalize(&comparable);
    assert!((metadata.risk_score - clean_meta.risk_score - 0.1).abs() < 1e-9);
}

#[test]
fn risk_score_is_capped_at_one() {
    let frame = Frame::from_rows(
        &["quantity", "item_name", "date"],
        &[
            &["-5", "", "garbage"],
            &["-2", "", ""],
            &["", "", ""],
            &["", "", ""],
        ],
    );
    let (_, metadata) = canonicalize(&frame);
    assert!(metadata.risk_score <= 1.0);
    assert!(metadata.risk_score >= 0.0);
}
