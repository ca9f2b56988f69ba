//! Error types for dataset loading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dataset operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file discovery
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Image file could not be decoded
    #[error("Failed to decode image {path}: {source}")]
    Image {
        /// File that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// Audio file could not be decoded
    #[error("Failed to decode audio {path}: {source}")]
    Audio {
        /// File that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        source: hound::Error,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Dataset length
        len: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Labels do not line up with datapoints
    #[error("Label count mismatch: {labels} labels for {datapoints} datapoints")]
    LabelMismatch {
        /// Number of labels supplied
        labels: usize,
        /// Number of datapoints in the dataset
        datapoints: usize,
    },
}
