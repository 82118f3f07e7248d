pub mod error;
pub mod frame;
pub mod ingest;
pub mod stats;
pub mod time;

pub use error::{Result, TriageError};
pub use frame::{FieldValue, Frame};
