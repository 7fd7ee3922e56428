//! Schema Error Types

use thiserror::Error;

/// Errors raised while reading canonical motion-log tables
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed CSV (ragged rows, bad quoting, invalid UTF-8)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column every row depends on is missing from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell could not be parsed as the column's type
    #[error("Invalid value {value:?} in column '{column}' at line {line}")]
    InvalidValue {
        column: &'static str,
        line: u64,
        value: String,
    },
}

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::Io(err.to_string())
    }
}
