//! Semantic file-type categories for uploaded datasets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Detected dataset category.
///
/// The declaration order is also the tie-break precedence in
/// [`detect_file_type`](super::detect_file_type): when two categories score
/// equally, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Inventory,
    Financial,
    SecurityLogs,
}

impl FileKind {
    /// All categories in detection precedence order.
    pub const ALL: [FileKind; 3] = [
        FileKind::Inventory,
        FileKind::Financial,
        FileKind::SecurityLogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Inventory => "inventory",
            FileKind::Financial => "financial",
            FileKind::SecurityLogs => "security_logs",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "inventory" => Ok(FileKind::Inventory),
            "financial" => Ok(FileKind::Financial),
            "security_logs" => Ok(FileKind::SecurityLogs),
            other => Err(format!("unknown file kind: '{}'", other)),
        }
    }
}
