//! End-to-end scenarios: raw frame → canonicalization → signals → plan.

use chrono::{DateTime, TimeZone, Utc};

use triage_core::Frame;
use triage_rules::canonicalize::{canonicalize, detect_file_type, FileKind, FileMetadata};
use triage_rules::registry::RuleRegistry;
use triage_rules::router::RuleRouter;
use triage_rules::signals::{self, FastSignal, SignalEngine};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn builtin_router() -> RuleRouter {
    RuleRouter::new(
        RuleRegistry::with_builtin_rules(),
        SignalEngine::with_builtin_signals(),
    )
}

fn frame_from_owned(headers: &[&str], rows: &[Vec<String>]) -> Frame {
    let refs: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
    Frame::from_rows(headers, &slices)
}

// ── Scenario A: uniform financial batch ─────────────────────────────

/// 20 rows sharing one amount, merchant, and hour: the duplicate rule is
/// scheduled and the identical-amount check fires.
#[test]
fn uniform_batch_schedules_duplicate_detection() {
    let rows: Vec<Vec<String>> = (0..20)
        .map(|_| {
            vec![
                "250".to_string(),
                "acme".to_string(),
                "2024-01-01 10:47:00".to_string(),
            ]
        })
        .collect();
    let raw = frame_from_owned(&["amount", "merchant", "timestamp"], &rows);
    let (frame, mut metadata) = canonicalize(&raw);
    assert_eq!(metadata.file_type, Some(FileKind::Financial));

    let engine = SignalEngine::with_builtin_signals();
    let batch = engine.calculate_all_signals_at(&frame, &metadata, fixed_now());
    let amount_signal = batch
        .iter()
        .find(|s| s.name == "amount_distribution")
        .expect("amount_distribution should apply");
    assert!(
        amount_signal.risk_score >= 0.4,
        "identical amounts must contribute at least 0.4, got {}",
        amount_signal.risk_score
    );

    let router = builtin_router();
    let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());
    assert!(plan
        .rules_to_execute
        .contains(&"duplicate_transactions".to_string()));
}

// ── Scenario B: small and empty datasets ────────────────────────────

/// Signals requiring five values still apply at exactly five.
#[test]
fn five_row_dataset_sits_on_the_signal_boundary() {
    let rows: Vec<Vec<String>> = (0..5)
        .map(|i| vec![format!("{}.25", 10 + i)])
        .collect();
    let frame = frame_from_owned(&["amount"], &rows);
    let metadata = FileMetadata::for_frame(&frame);

    let engine = SignalEngine::with_builtin_signals();
    let batch = engine.calculate_all_signals_at(&frame, &metadata, fixed_now());
    assert!(batch.iter().any(|s| s.name == "amount_distribution"));
}

/// A dataset yielding no risk at all is still floored to 0.1.
#[test]
fn empty_dataset_is_floored_to_base_risk() {
    let frame = Frame::from_rows(&["amount", "merchant"], &[]);
    let mut metadata = FileMetadata::for_frame(&frame);

    let router = builtin_router();
    let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());
    assert_eq!(metadata.risk_score, 0.1);
    assert_eq!(plan.early_termination_threshold, 0.8);
}

// ── Scenario C: inventory-only dataset ──────────────────────────────

/// Quantity/item columns detect as inventory; the off-hours rule is gated
/// out while the inventory movement rule is scheduled.
#[test]
fn inventory_dataset_excludes_off_hours_rule() {
    let raw = Frame::from_rows(
        &["quantity", "item_name"],
        &[&["5", "widget"], &["7", "gizmo"], &["2", "sprocket"]],
    );
    let (kind, _) = detect_file_type(&raw);
    assert_eq!(kind, FileKind::Inventory);

    let (frame, mut metadata) = canonicalize(&raw);
    let router = builtin_router();
    let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());

    assert!(!plan
        .rules_to_execute
        .contains(&"off_hours_transactions".to_string()));
    assert!(plan
        .rules_to_execute
        .contains(&"inventory_movement_anomalies".to_string()));
}

// ── Scenario D: elevated risk and expensive rules ───────────────────

/// Extreme amount variance pushes the aggregate risk past the expensive
/// exclusion threshold, so the ML rule stays scheduled on a non-financial
/// frame; a forced high-risk signal raises the termination threshold.
#[test]
fn elevated_risk_keeps_expensive_rule_scheduled() {
    let rows: Vec<Vec<String>> = (0..60)
        .map(|i| {
            let amount = if i == 59 { "1000000" } else { "10" };
            let score = if i % 2 == 0 { format!("{i}") } else { String::new() };
            let user = if i < 55 { "u1" } else { "u2" };
            vec![
                amount.to_string(),
                score,
                user.to_string(),
                "2024-01-01 10:00:00".to_string(),
            ]
        })
        .collect();
    let frame = frame_from_owned(&["amount", "score", "user_id", "timestamp"], &rows);
    let mut metadata = FileMetadata::for_frame(&frame);

    let router = builtin_router();
    let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());

    assert!(
        metadata.risk_score >= 0.3,
        "variance and concentration should push risk past 0.3, got {}",
        metadata.risk_score
    );
    assert!(
        plan.rules_to_execute
            .contains(&"anomaly_detection".to_string()),
        "expensive rule must survive the low-risk exclusion at risk {}",
        metadata.risk_score
    );
}

#[test]
fn high_risk_raises_termination_threshold() {
    fn forced(
        _: &Frame,
        _: &FileMetadata,
        _: DateTime<Utc>,
    ) -> triage_core::Result<Option<FastSignal>> {
        Ok(Some(FastSignal {
            name: "forced".to_string(),
            value: 0.0,
            risk_score: 0.9,
            confidence: 1.0,
            metadata: indexmap::IndexMap::new(),
        }))
    }

    let mut engine = SignalEngine::new();
    engine.register("forced", forced);
    let router = RuleRouter::new(RuleRegistry::with_builtin_rules(), engine);

    let frame = Frame::from_rows(&["amount"], &[&["1"]]);
    let mut metadata = FileMetadata::for_frame(&frame);
    let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());

    assert_eq!(metadata.risk_score, 0.9);
    assert_eq!(plan.early_termination_threshold, 0.9);
    assert!(router.should_terminate_early(0.9, plan.early_termination_threshold));
}

// ── Cross-cutting properties ────────────────────────────────────────

#[test]
fn aggregate_risk_is_always_in_unit_interval() {
    let frames = [
        Frame::from_rows(&["a"], &[]),
        Frame::from_rows(&["amount"], &[&[""], &[""], &[""]]),
        Frame::from_rows(
            &["amount", "user_id", "timestamp"],
            &[
                &["5", "u1", "2030-01-01 00:00:00"],
                &["5", "u1", "2030-01-01 00:00:01"],
                &["5", "u1", "2030-01-01 00:00:02"],
                &["5", "u1", "2030-01-01 00:00:03"],
                &["5", "u2", "2030-01-01 00:00:04"],
            ],
        ),
    ];

    let engine = SignalEngine::with_builtin_signals();
    for frame in &frames {
        let metadata = FileMetadata::for_frame(frame);
        let batch = engine.calculate_all_signals_at(frame, &metadata, fixed_now());
        let risk = signals::aggregate_risk_score(&batch);
        assert!((0.0..=1.0).contains(&risk), "risk {risk} out of range");
    }
}

#[test]
fn plan_ordering_property_holds_across_datasets() {
    let router = builtin_router();
    let datasets: Vec<Frame> = vec![
        Frame::from_rows(
            &["quantity", "item_name", "date"],
            &[&["5", "widget", "2024-01-01"], &["7", "gizmo", "2024-01-02"]],
        ),
        {
            let rows: Vec<Vec<String>> = (0..80)
                .map(|i| {
                    vec![
                        format!("{}", i + 1),
                        format!("{}.75", i),
                        "store".to_string(),
                        format!("2024-02-0{} 09:{:02}:00", 1 + i / 40, i % 40),
                        format!("u{}", i % 7),
                    ]
                })
                .collect();
            frame_from_owned(
                &["transaction_id", "amount", "merchant", "timestamp", "user_id"],
                &rows,
            )
        },
    ];

    for raw in datasets {
        let (frame, mut metadata) = canonicalize(&raw);
        let plan = router.create_execution_plan_at(&frame, &mut metadata, fixed_now());
        for pair in plan.rules_to_execute.windows(2) {
            let a = router.registry().get(&pair[0]).unwrap();
            let b = router.registry().get(&pair[1]).unwrap();
            assert!(
                a.cost < b.cost || (a.cost == b.cost && a.priority >= b.priority),
                "ordering violated: {} before {}",
                a.name,
                b.name
            );
        }
    }
}

#[test]
fn canonicalization_preserves_rows_and_prefixes_unmapped_columns() {
    let raw = Frame::from_rows(
        &["transaction_id", "amount", "loyalty_tier"],
        &[&["t1", "10", "gold"], &["t2", "20", "silver"]],
    );
    let (canonical, metadata) = canonicalize(&raw);
    assert_eq!(canonical.row_count(), raw.row_count());
    assert!(canonical.has_column("raw_loyalty_tier"));
    assert_eq!(metadata.row_count, 2);
}

#[test]
fn detection_is_a_pure_function_of_columns() {
    let a = Frame::from_rows(&["amount", "merchant"], &[&["1", "x"]]);
    let b = Frame::from_rows(&["amount", "merchant"], &[&["999", "y"], &["2", "z"]]);
    // Same column set, different data: identical detection result.
    assert_eq!(detect_file_type(&a), detect_file_type(&b));
}
