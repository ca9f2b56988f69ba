//! Preprocessing steps for image and audio datapoints
//!
//! A [`PreprocessingStep`] maps one datapoint to another of the same kind.
//! Steps compose into a [`PreprocessingPipeline`], which is itself a step.
//!
//! Image steps operate on [`media_data_core::RgbImage`] and audio steps on
//! [`media_data_core::AudioClip`]. Random steps take an explicit generator
//! through `with_rng` for reproducible runs.

#![warn(missing_docs)]

pub mod audio;
pub mod crop;
pub mod pipeline;
pub mod resample;

// Re-export key types for convenience
pub use audio::{RandomAudioCrop, Resample};
pub use crop::{CenterCrop, RandomCrop};
pub use pipeline::{PreprocessingPipeline, PreprocessingStep};
pub use resample::{LinearResampler, Resampler};
