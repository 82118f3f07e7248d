//! CSV ingestion into [`Frame`] with per-cell type inference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::Result;
use crate::frame::{FieldValue, Frame};

impl Frame {
    /// Read a headered CSV stream into a frame.
    ///
    /// Cell types are inferred per cell (integer → float → boolean → text);
    /// empty cells become `Null`. Rows shorter than the header are padded
    /// with `Null`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Frame> {
        let mut rdr = ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut columns: Vec<Vec<FieldValue>> = vec![Vec::new(); headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (i, column) in columns.iter_mut().enumerate() {
                let cell = record.get(i).unwrap_or("");
                column.push(FieldValue::from_raw(cell));
            }
        }

        let mut frame = Frame::new();
        for (header, column) in headers.into_iter().zip(columns) {
            frame.insert_column(header, column);
        }

        debug!(
            rows = frame.row_count(),
            columns = frame.column_count(),
            "parsed CSV dataset"
        );
        Ok(frame)
    }

    /// Read a CSV file from disk into a frame.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Frame> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_with_inferred_types() {
        let data = "amount,merchant,timestamp\n10,acme,2024-01-01\n20.5,globex,\n";
        let frame = Frame::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.column("amount").unwrap()[0], FieldValue::Integer(10));
        assert_eq!(frame.column("amount").unwrap()[1], FieldValue::Float(20.5));
        assert_eq!(frame.column("timestamp").unwrap()[1], FieldValue::Null);
    }

    #[test]
    fn header_only_csv_yields_empty_frame() {
        let frame = Frame::from_csv_reader("a,b,c\n".as_bytes()).unwrap();
        assert_eq!(frame.row_count(), 0);
        assert_eq!(frame.column_count(), 3);
    }
}
