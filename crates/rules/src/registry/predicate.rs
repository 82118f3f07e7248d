//! Applicability predicates: boolean gates a rule must pass before
//! scheduling.

use std::fmt;

use triage_core::Frame;

use crate::canonicalize::{FileKind, FileMetadata};

/// A named applicability check attached to a rule.
///
/// Predicates are pure: they never mutate the frame or metadata, and they
/// never propagate a failure — a condition that cannot be evaluated
/// (missing column, empty data) is simply `false`.
#[derive(Debug, Clone)]
pub struct RulePredicate {
    pub name: &'static str,
    pub kind: PredicateKind,
    pub description: &'static str,
}

impl RulePredicate {
    pub fn new(name: &'static str, kind: PredicateKind, description: &'static str) -> Self {
        RulePredicate {
            name,
            kind,
            description,
        }
    }

    /// Evaluate the predicate against a frame and its metadata.
    pub fn evaluate(&self, frame: &Frame, metadata: &FileMetadata) -> bool {
        self.kind.evaluate(frame, metadata)
    }
}

impl fmt::Display for RulePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The fixed set of predicate strategies.
///
/// Strategies are registered as data, not discovered dynamically; `Custom`
/// admits caller-defined checks with the same signature. A custom function
/// must report an unevaluable condition as `false` rather than panicking.
#[derive(Debug, Clone, Copy)]
pub enum PredicateKind {
    /// Column exists and has at least one non-null value.
    HasColumnWithValues(&'static str),
    /// Every listed column exists (values not required).
    HasColumns(&'static [&'static str]),
    /// Frame has at least this many rows.
    MinRows(usize),
    /// Column has more than one distinct non-null value.
    MultipleUsers(&'static str),
    /// Metadata file type equals the given kind.
    FileTypeIs(FileKind),
    /// Metadata file type differs from the given kind (or is unset).
    FileTypeIsNot(FileKind),
    /// Frame has at least this many all-numeric columns.
    MinNumericColumns(usize),
    /// Metadata risk score is strictly below the threshold.
    RiskBelow(f64),
    /// Caller-supplied check.
    Custom(fn(&Frame, &FileMetadata) -> bool),
}

impl PredicateKind {
    fn evaluate(&self, frame: &Frame, metadata: &FileMetadata) -> bool {
        match self {
            PredicateKind::HasColumnWithValues(column) => frame.has_values(column),
            PredicateKind::HasColumns(columns) => {
                columns.iter().all(|column| frame.has_column(column))
            }
            PredicateKind::MinRows(min) => frame.row_count() >= *min,
            PredicateKind::MultipleUsers(column) => frame.value_counts(column).len() > 1,
            PredicateKind::FileTypeIs(kind) => metadata.file_type == Some(*kind),
            PredicateKind::FileTypeIsNot(kind) => metadata.file_type != Some(*kind),
            PredicateKind::MinNumericColumns(min) => frame.numeric_column_count() >= *min,
            PredicateKind::RiskBelow(threshold) => metadata.risk_score < *threshold,
            PredicateKind::Custom(check) => check(frame, metadata),
        }
    }
}
