use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Signal error: {0}")]
    Signal(String),

    #[error("{0}")]
    Other(String),
}

/// Result alias for triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;
