use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Typed cell values — source data arrives as strings but we preserve type info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Infer the tightest type for a raw cell: empty → Null, then integer,
    /// float, boolean, and finally text.
    pub fn from_raw(raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return FieldValue::Float(f);
        }
        match trimmed {
            "true" | "True" | "TRUE" => FieldValue::Boolean(true),
            "false" | "False" | "FALSE" => FieldValue::Boolean(false),
            _ => FieldValue::Text(trimmed.to_string()),
        }
    }

    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract as f64 for numeric values (Integer or Float).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether this value is numeric (Integer or Float).
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }

    /// Stable grouping key for distinct-value counting, None for Null.
    pub fn grouping_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Null => None,
        }
    }
}

/// An in-memory tabular dataset: ordered named columns of equal length.
///
/// Column insertion order is preserved and observable (schema discovery,
/// canonical field layout). The frame is always rectangular: inserting a
/// column that is shorter than the current row count pads it with `Null`,
/// and inserting a longer one grows every existing column the same way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    columns: IndexMap<String, Vec<FieldValue>>,
    row_count: usize,
}

impl Frame {
    /// Create an empty frame with no columns and no rows.
    pub fn new() -> Frame {
        Frame {
            columns: IndexMap::new(),
            row_count: 0,
        }
    }

    /// Build a frame from raw string rows, inferring cell types.
    ///
    /// Missing trailing cells become `Null`; cells beyond the header count
    /// are dropped.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Frame {
        let mut columns: Vec<Vec<FieldValue>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            for (i, column) in columns.iter_mut().enumerate() {
                let cell = row.get(i).copied().unwrap_or("");
                column.push(FieldValue::from_raw(cell));
            }
        }
        let mut frame = Frame::new();
        for (header, column) in headers.iter().zip(columns) {
            frame.insert_column(*header, column);
        }
        frame
    }

    /// Insert or replace a column, keeping the frame rectangular.
    pub fn insert_column(&mut self, name: impl Into<String>, mut values: Vec<FieldValue>) {
        if values.len() > self.row_count {
            self.row_count = values.len();
            for column in self.columns.values_mut() {
                column.resize(self.row_count, FieldValue::Null);
            }
        } else {
            values.resize(self.row_count, FieldValue::Null);
        }
        self.columns.insert(name.into(), values);
    }

    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Total number of cells (rows × columns).
    pub fn cell_count(&self) -> usize {
        self.row_count * self.columns.len()
    }

    /// Number of `Null` cells across the whole frame.
    pub fn null_cell_count(&self) -> usize {
        self.columns
            .values()
            .map(|col| col.iter().filter(|v| v.is_null()).count())
            .sum()
    }

    /// Number of non-null cells in a column; 0 when the column is absent.
    pub fn non_null_count(&self, name: &str) -> usize {
        self.column(name)
            .map(|col| col.iter().filter(|v| !v.is_null()).count())
            .unwrap_or(0)
    }

    /// Whether a column exists and holds at least one non-null value.
    pub fn has_values(&self, name: &str) -> bool {
        self.non_null_count(name) > 0
    }

    /// Non-null numeric values of a column in row order.
    ///
    /// Empty when the column is absent or holds no numeric values.
    pub fn column_f64s(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|col| col.iter().filter_map(FieldValue::as_f64).collect())
            .unwrap_or_default()
    }

    /// Count of non-null occurrences per distinct value, keyed by grouping
    /// key, in order of first appearance.
    pub fn value_counts(&self, name: &str) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        if let Some(col) = self.column(name) {
            for value in col {
                if let Some(key) = value.grouping_key() {
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Number of columns that hold at least one value and whose non-null
    /// values are all numeric.
    pub fn numeric_column_count(&self) -> usize {
        self.columns
            .values()
            .filter(|col| {
                let mut any = false;
                for value in col.iter() {
                    if value.is_null() {
                        continue;
                    }
                    if !value.is_numeric() {
                        return false;
                    }
                    any = true;
                }
                any
            })
            .count()
    }
}
