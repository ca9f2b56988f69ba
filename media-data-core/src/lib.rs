//! Core data model, dataset store and batch loading for image/audio datasets
//!
//! This crate provides the pieces every loader strategy builds on: the
//! datapoint model, the decode routines, the [`Dataset`] trait with its shared
//! [`DatasetCore`] store and [`dispatch_load`] helper, and the [`BatchLoader`].
//!
//! Everything is synchronous and single-threaded. File I/O happens on the
//! caller's thread. Random operations take an explicit generator in their
//! `*_with_rng` form and fall back to `rand::thread_rng()` otherwise.

#![warn(missing_docs)]

pub mod batch;
pub mod datapoint;
pub mod dataset;
pub mod decode;
pub mod error;

// Re-export key types for convenience
pub use batch::{Batch, BatchLoader, BatchLoaderOptions, Batches};
pub use datapoint::{AudioClip, DataType, Datapoint, DecodeFailure, Decoded, Item, Label, LoadingMethod};
pub use dataset::{dispatch_load, Dataset, DatasetCore, DatasetState, Entry, InMemoryDataset};
pub use decode::Decoder;
pub use error::{Error, Result};

/// Re-exported so callers can name image types without a direct dependency
pub use image::RgbImage;
