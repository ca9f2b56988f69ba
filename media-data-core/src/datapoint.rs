//! Datapoint model: what a dataset stores and what indexed reads return

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::decode::{self, Decoder};
use crate::error::{Error, Result};

/// Kind of media a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// JPEG images, decoded to 8-bit RGB
    #[default]
    Image,
    /// WAV audio, decoded to mono `f32` samples
    Audio,
}

impl DataType {
    /// File extension (without the dot) discovered for this data type
    pub fn extension(self) -> &'static str {
        match self {
            DataType::Image => "jpg",
            DataType::Audio => "wav",
        }
    }

    /// Decode routine for this data type
    pub fn decoder(self) -> Decoder {
        match self {
            DataType::Image => decode::decode_image,
            DataType::Audio => decode::decode_audio,
        }
    }

    /// Whether `path` carries this data type's extension (ASCII case-insensitive)
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(DataType::Image),
            "audio" => Ok(DataType::Audio),
            other => Err(Error::InvalidArgument(format!(
                "data_type must be 'image' or 'audio', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Image => f.write_str("image"),
            DataType::Audio => f.write_str("audio"),
        }
    }
}

/// When datapoints are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMethod {
    /// Store paths, decode on every indexed read
    #[default]
    Lazy,
    /// Decode everything while the dataset is populated
    Eager,
}

impl FromStr for LoadingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lazy" => Ok(LoadingMethod::Lazy),
            "eager" => Ok(LoadingMethod::Eager),
            other => Err(Error::InvalidArgument(format!(
                "loading_method must be 'lazy' or 'eager', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for LoadingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingMethod::Lazy => f.write_str("lazy"),
            LoadingMethod::Eager => f.write_str("eager"),
        }
    }
}

/// A label attached to a datapoint. Passed through verbatim, never encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label
    Integer(i64),
    /// Free-form text label (class directory name, CSV cell)
    Text(String),
}

impl Label {
    /// The label as text, if it is a text label
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Text(s) => Some(s),
            Label::Integer(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Integer(n) => write!(f, "{n}"),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_owned())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Integer(value)
    }
}

/// A decoded audio track
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Mono samples in [-1, 1]
    pub samples: Vec<f32>,
    /// Samples per second
    pub sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from samples and a sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Track duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// One unit of data: a decoded image or a decoded audio track
#[derive(Debug, Clone, PartialEq)]
pub enum Datapoint {
    /// 3-channel pixel grid
    Image(RgbImage),
    /// Signal plus sample rate
    Audio(AudioClip),
}

impl Datapoint {
    /// Data type of this datapoint
    pub fn data_type(&self) -> DataType {
        match self {
            Datapoint::Image(_) => DataType::Image,
            Datapoint::Audio(_) => DataType::Audio,
        }
    }

    /// Borrow the image, if this is an image
    pub fn as_image(&self) -> Option<&RgbImage> {
        match self {
            Datapoint::Image(img) => Some(img),
            Datapoint::Audio(_) => None,
        }
    }

    /// Borrow the audio clip, if this is audio
    pub fn as_audio(&self) -> Option<&AudioClip> {
        match self {
            Datapoint::Audio(clip) => Some(clip),
            Datapoint::Image(_) => None,
        }
    }

    /// Take the image, if this is an image
    pub fn into_image(self) -> Option<RgbImage> {
        match self {
            Datapoint::Image(img) => Some(img),
            Datapoint::Audio(_) => None,
        }
    }

    /// Take the audio clip, if this is audio
    pub fn into_audio(self) -> Option<AudioClip> {
        match self {
            Datapoint::Audio(clip) => Some(clip),
            Datapoint::Image(_) => None,
        }
    }
}

/// Why a file could not be turned into a datapoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// File that failed to decode
    pub path: PathBuf,
    /// Decoder message
    pub reason: String,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Outcome of decoding one file.
///
/// A corrupt or unreadable file does not abort a dataset pass; it resolves to
/// `Failed` and the caller decides whether to skip or report it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Decoded successfully
    Ready(Datapoint),
    /// Decoding failed
    Failed(DecodeFailure),
}

impl Decoded {
    /// Decode `path` with `decoder`, logging and containing any failure
    pub fn from_path(decoder: Decoder, path: &Path) -> Self {
        match decoder(path) {
            Ok(datapoint) => Decoded::Ready(datapoint),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to decode datapoint");
                Decoded::Failed(DecodeFailure {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Whether decoding failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Decoded::Failed(_))
    }

    /// Borrow the datapoint, if decoding succeeded
    pub fn datapoint(&self) -> Option<&Datapoint> {
        match self {
            Decoded::Ready(datapoint) => Some(datapoint),
            Decoded::Failed(_) => None,
        }
    }

    /// Take the datapoint, if decoding succeeded
    pub fn into_datapoint(self) -> Option<Datapoint> {
        match self {
            Decoded::Ready(datapoint) => Some(datapoint),
            Decoded::Failed(_) => None,
        }
    }

    /// Convert into a `Result`, keeping the failure
    pub fn into_result(self) -> std::result::Result<Datapoint, DecodeFailure> {
        match self {
            Decoded::Ready(datapoint) => Ok(datapoint),
            Decoded::Failed(failure) => Err(failure),
        }
    }
}

/// What an indexed read returns: the decoded datapoint and its label, if the
/// dataset has labels
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Decoded datapoint (or the reason it could not be decoded)
    pub data: Decoded,
    /// Label, `None` when the dataset carries no labels
    pub label: Option<Label>,
}

impl Item {
    /// Split into datapoint and label
    pub fn into_parts(self) -> (Decoded, Option<Label>) {
        (self.data, self.label)
    }
}
