//! Sample-rate conversion capability

use media_data_core::{Error, Result};

/// Converts a signal from one sample rate to another
pub trait Resampler {
    /// Resample `signal` from `from_rate` to `to_rate`
    fn resample(&self, signal: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>>;
}

/// Linear interpolation between neighbouring samples
///
/// Output length is `ceil(len * to_rate / from_rate)`. No anti-aliasing
/// filter is applied when downsampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearResampler;

impl Resampler for LinearResampler {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn resample(&self, signal: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
        if from_rate == 0 || to_rate == 0 {
            return Err(Error::InvalidArgument("sample rates must be positive".into()));
        }
        if from_rate == to_rate || signal.is_empty() {
            return Ok(signal.to_vec());
        }

        let step = f64::from(from_rate) / f64::from(to_rate);
        let out_len =
            (signal.len() as u64 * u64::from(to_rate)).div_ceil(u64::from(from_rate)) as usize;
        let last = signal.len() - 1;

        let resampled = (0..out_len)
            .map(|j| {
                let position = j as f64 * step;
                let i = (position.floor() as usize).min(last);
                let next = (i + 1).min(last);
                let frac = (position - i as f64) as f32;
                signal[i] + (signal[next] - signal[i]) * frac
            })
            .collect();

        Ok(resampled)
    }
}
