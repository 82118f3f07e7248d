//! Built-in fast signal implementations.
//!
//! Each function takes the raw frame, the file metadata, and the evaluation
//! instant, returning `Ok(None)` when its required columns are missing or
//! the dataset is below the signal's statistical minimum.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde_json::json;

use triage_core::{stats, time::parse_timestamp, Frame, Result};

use super::FastSignal;
use crate::canonicalize::FileMetadata;

// ── data_quality ────────────────────────────────────────────────────

/// Missing-cell ratio, scaled up: risk = min(ratio × 2, 1).
pub(super) fn data_quality(
    frame: &Frame,
    _metadata: &FileMetadata,
    _now: DateTime<Utc>,
) -> Result<Option<FastSignal>> {
    if frame.row_count() == 0 {
        return Ok(None);
    }

    let cells = frame.cell_count();
    let missing_ratio = if cells == 0 {
        0.0
    } else {
        frame.null_cell_count() as f64 / cells as f64
    };
    let risk_score = (missing_ratio * 2.0).min(1.0);

    Ok(Some(FastSignal {
        name: "data_quality".to_string(),
        value: missing_ratio,
        risk_score,
        confidence: 0.8,
        metadata: IndexMap::from_iter([
            ("missing_ratio".to_string(), json!(missing_ratio)),
            ("total_cells".to_string(), json!(cells)),
        ]),
    }))
}

// ── file_size ───────────────────────────────────────────────────────

/// Row-count tiering: very large uploads carry mild intrinsic risk.
pub(super) fn file_size(
    frame: &Frame,
    _metadata: &FileMetadata,
    _now: DateTime<Utc>,
) -> Result<Option<FastSignal>> {
    let row_count = frame.row_count();
    let risk_score = if row_count > 10_000 {
        0.3
    } else if row_count > 5_000 {
        0.1
    } else {
        0.0
    };

    Ok(Some(FastSignal {
        name: "file_size".to_string(),
        value: row_count as f64,
        risk_score,
        confidence: 0.6,
        metadata: IndexMap::from_iter([("row_count".to_string(), json!(row_count))]),
    }))
}

// ── amount_distribution ─────────────────────────────────────────────

/// Distribution shape of the amount column: identical values, extreme
/// dispersion, and round-number bias. Needs ≥ 5 non-null numeric values.
pub(super) fn amount_distribution(
    frame: &Frame,
    _metadata: &FileMetadata,
    _now: DateTime<Utc>,
) -> Result<Option<FastSignal>> {
    let amounts = frame.column_f64s("amount");
    if amounts.len() < 5 {
        return Ok(None);
    }

    let mut risk_score: f64 = 0.0;

    let unique_values = {
        let mut bits: Vec<u64> = amounts.iter().map(|a| a.to_bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        bits.len()
    };
    if unique_values == 1 {
        risk_score += 0.4;
    }

    let cv = stats::coefficient_of_variation(&amounts);
    if cv > 3.0 {
        risk_score += 0.3;
    }

    let round_ratio =
        amounts.iter().filter(|a| a.fract() == 0.0).count() as f64 / amounts.len() as f64;
    if round_ratio > 0.8 {
        risk_score += 0.2;
    }

    Ok(Some(FastSignal {
        name: "amount_distribution".to_string(),
        value: cv,
        risk_score: risk_score.min(1.0),
        confidence: 0.7,
        metadata: IndexMap::from_iter([
            ("coefficient_of_variation".to_string(), json!(cv)),
            ("round_number_ratio".to_string(), json!(round_ratio)),
            ("unique_values".to_string(), json!(unique_values)),
        ]),
    }))
}

// ── temporal_pattern ────────────────────────────────────────────────

/// Timing anomalies in the timestamp column: tight clustering, future
/// timestamps, and stale data. Needs ≥ 5 parseable values; an entirely
/// unparseable column declines instead of erroring.
pub(super) fn temporal_pattern(
    frame: &Frame,
    _metadata: &FileMetadata,
    now: DateTime<Utc>,
) -> Result<Option<FastSignal>> {
    let Some(column) = frame.column("timestamp") else {
        return Ok(None);
    };

    let timestamps: Vec<DateTime<Utc>> = column
        .iter()
        .filter_map(|v| v.as_str().and_then(parse_timestamp))
        .collect();
    if timestamps.len() < 5 {
        return Ok(None);
    }

    // Consecutive deltas in file order; negative deltas count as clustered.
    let deltas: Vec<Duration> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    let clustered = deltas
        .iter()
        .filter(|d| **d < Duration::minutes(1))
        .count();

    let mut risk_score: f64 = 0.0;
    if !deltas.is_empty() && clustered as f64 > deltas.len() as f64 * 0.8 {
        risk_score += 0.4;
    }

    let future = timestamps.iter().filter(|t| **t > now).count();
    if future > 0 {
        risk_score += 0.3;
    }

    let stale_cutoff = now - Duration::days(365);
    let old = timestamps.iter().filter(|t| **t < stale_cutoff).count();
    if old as f64 > timestamps.len() as f64 * 0.5 {
        risk_score += 0.2;
    }

    Ok(Some(FastSignal {
        name: "temporal_pattern".to_string(),
        value: deltas.len() as f64,
        risk_score: risk_score.min(1.0),
        confidence: 0.6,
        metadata: IndexMap::from_iter([
            ("future_timestamps".to_string(), json!(future)),
            ("old_timestamps".to_string(), json!(old)),
            ("time_clustering".to_string(), json!(clustered)),
        ]),
    }))
}

// ── user_behavior ───────────────────────────────────────────────────

/// Concentration and diversity of the user-id column: one dominant user, or
/// implausibly many distinct users. Needs ≥ 2 distinct non-null users.
pub(super) fn user_behavior(
    frame: &Frame,
    _metadata: &FileMetadata,
    _now: DateTime<Utc>,
) -> Result<Option<FastSignal>> {
    if !frame.has_column("user_id") {
        return Ok(None);
    }

    let counts = frame.value_counts("user_id");
    if counts.len() < 2 {
        return Ok(None);
    }

    let rows = frame.row_count() as f64;
    let max_count = counts.values().copied().max().unwrap_or(0);
    let max_user_ratio = max_count as f64 / rows;
    let user_diversity = counts.len() as f64 / rows;

    let mut risk_score: f64 = 0.0;
    if max_user_ratio > 0.8 {
        risk_score += 0.4;
    }
    if user_diversity > 0.9 && frame.row_count() > 100 {
        risk_score += 0.2;
    }

    Ok(Some(FastSignal {
        name: "user_behavior".to_string(),
        value: user_diversity,
        risk_score: risk_score.min(1.0),
        confidence: 0.7,
        metadata: IndexMap::from_iter([
            ("max_user_ratio".to_string(), json!(max_user_ratio)),
            ("user_diversity".to_string(), json!(user_diversity)),
            ("unique_users".to_string(), json!(counts.len())),
        ]),
    }))
}
