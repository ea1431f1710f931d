use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a [`Repository`](super::Repository).
///
/// Loading is all-or-nothing: any of these aborts the load and no partial
/// repository is produced.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The source could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV layer rejected a row (bad quoting, wrong field count, non-numeric value, ...).
    #[error("malformed CSV at line {line}: {source}")]
    Csv {
        /// 1-based line in the source.
        line: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    /// A `date` value could not be parsed.
    #[error("unparsable date {value:?} at line {line}")]
    InvalidDate {
        /// 1-based line in the source.
        line: u64,
        /// Raw cell value.
        value: String,
    },

    /// A non-date column held a value outside its domain (unknown weekday, bad flag,
    /// blank channel, negative or non-finite money, weather score outside 1..=10).
    #[error("invalid value {value:?} for column `{column}` at line {line}")]
    InvalidField {
        /// 1-based line in the source.
        line: u64,
        /// Column name.
        column: &'static str,
        /// Raw cell value.
        value: String,
    },

    /// The source holds no records, so the repository has no date bounds.
    #[error("data source contains no records")]
    Empty,
}
