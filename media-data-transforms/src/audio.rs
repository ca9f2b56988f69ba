//! Audio steps: random fixed-duration crop and resampling

use media_data_core::{AudioClip, Error, Result};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::pipeline::PreprocessingStep;
use crate::resample::{LinearResampler, Resampler};

/// Cut a window of fixed duration at a uniformly random start time
///
/// Tracks no longer than the window are returned unchanged.
#[derive(Debug, Clone)]
pub struct RandomAudioCrop<R = ThreadRng> {
    /// Window length in seconds
    duration: f64,
    rng: R,
}

impl RandomAudioCrop<ThreadRng> {
    /// Create a crop of `duration` seconds using the thread-local generator
    pub fn new(duration: f64) -> Result<Self> {
        Self::with_rng(duration, rand::thread_rng())
    }
}

impl<R: Rng> RandomAudioCrop<R> {
    /// Create a crop of `duration` seconds drawing start times from `rng`
    pub fn with_rng(duration: f64, rng: R) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "crop duration must be a positive number of seconds, got {duration}"
            )));
        }
        Ok(Self { duration, rng })
    }

    /// Window length in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl<R: Rng> PreprocessingStep<AudioClip> for RandomAudioCrop<R> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply(&mut self, clip: AudioClip) -> Result<AudioClip> {
        let track_duration = clip.duration();
        if track_duration <= self.duration {
            return Ok(clip);
        }

        let max_start = track_duration - self.duration;
        let start_time = self.rng.gen_range(0.0..=max_start);
        tracing::trace!(start_time, duration = self.duration, "random audio crop");
        let rate = f64::from(clip.sample_rate);

        let len = clip.samples.len();
        let start = ((start_time * rate) as usize).min(len);
        let end = (((start_time + self.duration) * rate) as usize).clamp(start, len);

        Ok(AudioClip::new(clip.samples[start..end].to_vec(), clip.sample_rate))
    }
}

/// Convert a clip to a fixed target sample rate
#[derive(Debug, Clone)]
pub struct Resample<S = LinearResampler> {
    target_rate: u32,
    resampler: S,
}

impl Resample<LinearResampler> {
    /// Resample to `target_rate` with linear interpolation
    pub fn new(target_rate: u32) -> Result<Self> {
        Self::with_resampler(target_rate, LinearResampler)
    }
}

impl<S: Resampler> Resample<S> {
    /// Resample to `target_rate` with a custom resampler
    pub fn with_resampler(target_rate: u32, resampler: S) -> Result<Self> {
        if target_rate == 0 {
            return Err(Error::InvalidArgument("target sample rate must be positive".into()));
        }
        Ok(Self { target_rate, resampler })
    }

    /// Target sample rate
    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }
}

impl<S: Resampler> PreprocessingStep<AudioClip> for Resample<S> {
    fn apply(&mut self, clip: AudioClip) -> Result<AudioClip> {
        let samples = self
            .resampler
            .resample(&clip.samples, clip.sample_rate, self.target_rate)?;
        Ok(AudioClip::new(samples, self.target_rate))
    }
}
