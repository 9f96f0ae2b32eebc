//! Error types for the Sheetwright library.
//!
//! Validation failures and duplicate collisions are not errors: they are
//! reported as values (see [`crate::ValidationResult`] and
//! [`crate::CommitResult`]). The variants here cover caller misuse and the
//! I/O performed by the CSV sheet store and config loading.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sheetwright operations.
#[derive(Debug, Error)]
pub enum SheetwrightError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A row index that does not address an existing row.
    #[error("Row {index} is out of range (sheet has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// A row whose cell count does not match the sheet's headers.
    #[error("Row has {found} cells but the sheet has {expected} headers")]
    ColumnMismatch { expected: usize, found: usize },

    /// Empty file or no headers to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Result type alias for Sheetwright operations.
pub type Result<T> = std::result::Result<T, SheetwrightError>;
