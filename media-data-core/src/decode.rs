//! Decode routines for the supported file types
//!
//! These sit at the boundary to the `image` and `hound` codecs. Each routine
//! opens the file, decodes it and closes it again before returning.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::datapoint::{AudioClip, Datapoint};
use crate::error::{Error, Result};

/// A decode routine: path in, datapoint out
pub type Decoder = fn(&Path) -> Result<Datapoint>;

/// Decode an image file into an 8-bit RGB pixel grid
pub fn decode_image(path: &Path) -> Result<Datapoint> {
    let image = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Datapoint::Image(image.to_rgb8()))
}

/// Decode a WAV file into mono `f32` samples at the file's native rate
///
/// Multi-channel audio is downmixed by averaging the channels of each frame.
/// Integer PCM is scaled into [-1, 1].
#[allow(clippy::cast_precision_loss)]
pub fn decode_audio(path: &Path) -> Result<Datapoint> {
    let map_err = |source| Error::Audio {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(map_err)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(map_err)?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(map_err)?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(Datapoint::Audio(AudioClip::new(samples, spec.sample_rate)))
}
