//! Error types for dataset readers

use std::path::PathBuf;

use thiserror::Error;

/// Error type for dataset readers
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] media_data_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV format error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A label file row has no label column
    #[error("Row {row} of {path} has no label column")]
    MissingLabelColumn {
        /// Label file
        path: PathBuf,
        /// Zero-based row number
        row: usize,
    },
}

/// Result type for dataset readers
pub type Result<T> = std::result::Result<T, Error>;
