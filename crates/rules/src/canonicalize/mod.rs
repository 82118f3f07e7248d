//! Schema canonicalization: file-type inference and column remapping.
//!
//! Uploaded datasets arrive with arbitrary column vocabularies. This module
//! infers the semantic category of a frame from its column names, remaps the
//! columns onto the canonical field vocabulary for that category, and
//! produces [`FileMetadata`] describing what was found. Unmapped source
//! columns are preserved under a `raw_` prefix so no information is silently
//! dropped, and row count is always preserved exactly.

mod kind;
mod mappings;
mod risk;

pub use kind::FileKind;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::{FieldValue, Frame};

use mappings::{alias_table, heuristics, indicators};
use risk::intake_risk_score;

// ── File metadata ───────────────────────────────────────────────────

/// Descriptive metadata for an analyzed dataset.
///
/// Created once per dataset by [`canonicalize`] (or
/// [`FileMetadata::for_frame`] when canonicalization is skipped). The router
/// later overwrites `risk_score` with the aggregate fast-signal risk; the
/// remaining fields are read-only after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Detected category; `None` when the frame was never canonicalized.
    pub file_type: Option<FileKind>,
    /// Original column name → canonical field name, in discovery order.
    pub detected_schema: IndexMap<String, String>,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
    pub row_count: usize,
    pub has_timestamp: bool,
    pub has_amount: bool,
    pub has_user_id: bool,
    /// Current risk estimate in [0, 1]; updated in place by the router.
    pub risk_score: f64,
}

impl FileMetadata {
    /// Metadata for a frame that skips canonicalization: no detected
    /// category, no schema mapping, zero risk.
    pub fn for_frame(frame: &Frame) -> FileMetadata {
        FileMetadata {
            file_type: None,
            detected_schema: IndexMap::new(),
            confidence: 0.0,
            row_count: frame.row_count(),
            has_timestamp: frame.has_values("timestamp"),
            has_amount: frame.has_values("amount"),
            has_user_id: frame.has_values("user_id"),
            risk_score: 0.0,
        }
    }
}

// ── File-type detection ─────────────────────────────────────────────

/// Infer the dataset category from its column names.
///
/// Each primary indicator substring found among the lowercased, trimmed
/// column names contributes 2 points; each category's secondary heuristic
/// group contributes 1 when any of its substrings appears. The highest
/// score wins, ties broken by [`FileKind::ALL`] order, so the result is a
/// pure function of the column-name set. Confidence is `min(score / 10, 1)`.
pub fn detect_file_type(frame: &Frame) -> (FileKind, f64) {
    let columns: Vec<String> = frame
        .column_names()
        .map(|c| c.trim().to_lowercase())
        .collect();
    let any_contains = |needle: &str| columns.iter().any(|c| c.contains(needle));

    let mut best = FileKind::ALL[0];
    let mut best_score = 0u32;

    for kind in FileKind::ALL {
        let mut score: u32 = indicators(kind)
            .iter()
            .filter(|needle| any_contains(needle))
            .count() as u32
            * 2;
        if heuristics(kind).iter().any(|needle| any_contains(needle)) {
            score += 1;
        }

        if score > best_score {
            best = kind;
            best_score = score;
        }
    }

    let confidence = (best_score as f64 / 10.0).min(1.0);
    (best, confidence)
}

// ── Canonicalization ────────────────────────────────────────────────

/// Remap a frame onto the canonical field vocabulary of its detected
/// category and compute intake metadata.
///
/// For each canonical field the first alias present in the source binds the
/// field (first-match-wins); fields with no matching alias become all-null
/// columns. Every unconsumed source column is carried through as
/// `raw_<original>`. Canonicalization never filters rows and never fails:
/// malformed data surfaces as risk, not as an error.
pub fn canonicalize(frame: &Frame) -> (Frame, FileMetadata) {
    let (file_type, confidence) = detect_file_type(frame);

    let mut canonical = Frame::new();
    let mut detected_schema: IndexMap<String, String> = IndexMap::new();

    for (canonical_field, aliases) in alias_table(file_type) {
        match aliases.iter().find(|alias| frame.has_column(alias)) {
            Some(alias) => {
                let values = frame
                    .column(alias)
                    .map(<[FieldValue]>::to_vec)
                    .unwrap_or_default();
                canonical.insert_column(*canonical_field, values);
                detected_schema.insert(alias.to_string(), canonical_field.to_string());
            }
            None => {
                canonical.insert_column(
                    *canonical_field,
                    vec![FieldValue::Null; frame.row_count()],
                );
            }
        }
    }

    for column in frame.column_names() {
        if !detected_schema.contains_key(column) {
            let values = frame
                .column(column)
                .map(<[FieldValue]>::to_vec)
                .unwrap_or_default();
            canonical.insert_column(format!("raw_{column}"), values);
        }
    }

    let risk_score = intake_risk_score(&canonical, file_type);

    debug!(
        file_type = %file_type,
        confidence,
        mapped = detected_schema.len(),
        risk_score,
        "canonicalized dataset schema"
    );

    let metadata = FileMetadata {
        file_type: Some(file_type),
        detected_schema,
        confidence,
        row_count: frame.row_count(),
        has_timestamp: canonical.has_values("timestamp"),
        has_amount: canonical.has_values("amount"),
        has_user_id: canonical.has_values("user_id"),
        risk_score,
    };

    (canonical, metadata)
}

#[cfg(test)]
mod tests;
