//! Intake risk scoring over the canonicalized frame.

use triage_core::{stats, time::parse_timestamp, FieldValue, Frame};

use super::kind::FileKind;

/// Initial data-quality risk for a freshly canonicalized frame, in [0, 1].
///
/// Accumulates: 0.3 × missing-cell ratio; up to 0.2 for negative amounts;
/// 0.1 when the maximum amount exceeds ten times the 99th percentile; 0.2
/// when the timestamp column holds any unparseable value; 0.1 when an
/// inventory frame has a negative quantity.
pub(super) fn intake_risk_score(canonical: &Frame, kind: FileKind) -> f64 {
    let mut risk = 0.0;

    let cells = canonical.cell_count();
    if cells > 0 {
        risk += canonical.null_cell_count() as f64 / cells as f64 * 0.3;
    }

    let amounts = canonical.column_f64s("amount");
    if !amounts.is_empty() {
        let rows = canonical.row_count() as f64;
        let negatives = amounts.iter().filter(|a| **a < 0.0).count();
        if negatives > 0 {
            risk += (negatives as f64 / rows).min(0.2);
        }

        let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > stats::quantile(&amounts, 0.99) * 10.0 {
            risk += 0.1;
        }
    }

    if has_unparseable_timestamps(canonical) {
        risk += 0.2;
    }

    if kind == FileKind::Inventory {
        let quantities = canonical.column_f64s("quantity");
        if quantities.iter().any(|q| *q < 0.0) {
            risk += 0.1;
        }
    }

    risk.min(1.0)
}

/// Whether the timestamp column has non-null values and any of them fails
/// to parse. Numeric values pass (epoch-like); text must parse as a date.
fn has_unparseable_timestamps(canonical: &Frame) -> bool {
    let Some(column) = canonical.column("timestamp") else {
        return false;
    };
    let mut saw_value = false;
    let mut saw_bad = false;
    for value in column {
        match value {
            FieldValue::Null => {}
            FieldValue::Integer(_) | FieldValue::Float(_) => saw_value = true,
            FieldValue::Text(s) => {
                saw_value = true;
                if parse_timestamp(s).is_none() {
                    saw_bad = true;
                }
            }
            FieldValue::Boolean(_) => {
                saw_value = true;
                saw_bad = true;
            }
        }
    }
    saw_value && saw_bad
}
