//! Fast signals: cheap statistical checks fused into an early risk estimate.
//!
//! Each signal is an independent function over the raw frame — no
//! canonicalization required — that either produces a [`FastSignal`] or
//! declines (`Ok(None)`) when its required columns are absent or the data is
//! too small to be meaningful. A failing signal is logged and skipped; it
//! never aborts the others. The aggregate risk is a confidence-weighted mean
//! of the individual risk scores.

mod builtin;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use triage_core::{Frame, Result};

use crate::canonicalize::FileMetadata;

// ── Signal result ───────────────────────────────────────────────────

/// Result of one fast signal calculation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastSignal {
    /// Signal name, unique within one invocation batch.
    pub name: String,
    /// Signal-specific measurement (ratio, count, coefficient, …).
    pub value: f64,
    /// Risk contribution in [0, 1].
    pub risk_score: f64,
    /// Fixed fusion weight in (0, 1], not a statistical confidence interval.
    pub confidence: f64,
    /// Open diagnostic payload.
    pub metadata: IndexMap<String, serde_json::Value>,
}

/// A registered signal function.
///
/// Returns `Ok(None)` when the signal does not apply to this frame, and
/// `Err` for an internal failure — the engine logs and skips it.
pub type SignalFn = fn(&Frame, &FileMetadata, DateTime<Utc>) -> Result<Option<FastSignal>>;

// ── Signal engine ───────────────────────────────────────────────────

/// Holds the registered signal functions in a fixed, explicit table.
///
/// Construct once (usually via [`with_builtin_signals`]) and share freely:
/// the table is immutable after construction and evaluation takes `&self`.
///
/// [`with_builtin_signals`]: SignalEngine::with_builtin_signals
pub struct SignalEngine {
    signals: IndexMap<&'static str, SignalFn>,
}

impl SignalEngine {
    /// Create an engine with no registered signals.
    pub fn new() -> SignalEngine {
        SignalEngine {
            signals: IndexMap::new(),
        }
    }

    /// Create an engine with the built-in signal battery registered.
    pub fn with_builtin_signals() -> SignalEngine {
        let mut engine = SignalEngine::new();
        engine.register("data_quality", builtin::data_quality);
        engine.register("file_size", builtin::file_size);
        engine.register("amount_distribution", builtin::amount_distribution);
        engine.register("temporal_pattern", builtin::temporal_pattern);
        engine.register("user_behavior", builtin::user_behavior);
        engine
    }

    /// Register a signal function, overwriting any previous entry by name.
    pub fn register(&mut self, name: &'static str, signal: SignalFn) {
        self.signals.insert(name, signal);
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Evaluate every registered signal against the frame at `Utc::now()`.
    pub fn calculate_all_signals(&self, frame: &Frame, metadata: &FileMetadata) -> Vec<FastSignal> {
        self.calculate_all_signals_at(frame, metadata, Utc::now())
    }

    /// Evaluate every registered signal at an explicit instant.
    ///
    /// Signals run independently: one failing signal is logged and skipped
    /// without affecting the rest.
    pub fn calculate_all_signals_at(
        &self,
        frame: &Frame,
        metadata: &FileMetadata,
        now: DateTime<Utc>,
    ) -> Vec<FastSignal> {
        let mut results = Vec::new();
        for (name, signal) in &self.signals {
            match signal(frame, metadata, now) {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    warn!(signal = *name, error = %e, "fast signal failed, skipping");
                }
            }
        }
        results
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::with_builtin_signals()
    }
}

// ── Aggregation ─────────────────────────────────────────────────────

/// Confidence-weighted mean of the signal risk scores.
///
/// Returns 0.0 for an empty batch or zero total weight. The result is
/// always in [0, 1] because each risk score is.
pub fn aggregate_risk_score(signals: &[FastSignal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for signal in signals {
        weighted_sum += signal.risk_score * signal.confidence;
        total_weight += signal.confidence;
    }

    if total_weight == 0.0 {
        return 0.0;
    }
    weighted_sum / total_weight
}
