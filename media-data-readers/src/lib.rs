//! Directory-scan dataset strategies
//!
//! This crate fills a [`media_data_core::DatasetCore`] by walking the
//! filesystem. Two layouts are supported: a flat folder of files with an
//! optional label file beside it, and one subdirectory per class.

mod error;

pub mod common;
pub mod flat;
pub mod labels;
pub mod tree;

pub use common::DatasetOptions;
pub use error::{Error, Result};
pub use flat::FlatFolderDataset;
pub use tree::ClassFolderDataset;

// Re-export core types
pub use media_data_core::{
    Batch, BatchLoader, BatchLoaderOptions, DataType, Dataset, Datapoint, Decoded, Item, Label, LoadingMethod,
};
