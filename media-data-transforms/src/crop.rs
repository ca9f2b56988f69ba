//! Image cropping steps

use image::{imageops, RgbImage};
use media_data_core::{Error, Result};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::pipeline::PreprocessingStep;

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument(
            "width and height must be positive integers".into(),
        ));
    }
    Ok(())
}

/// Crop a window of fixed size from the center of the image
///
/// When the image is smaller than the window along an axis, that axis is kept
/// whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterCrop {
    width: u32,
    height: u32,
}

impl CenterCrop {
    /// Create a center crop of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_size(width, height)?;
        Ok(Self { width, height })
    }

    /// Window width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl PreprocessingStep<RgbImage> for CenterCrop {
    fn apply(&mut self, image: RgbImage) -> Result<RgbImage> {
        let (w, h) = image.dimensions();

        let top = h.saturating_sub(self.height) / 2;
        let left = w.saturating_sub(self.width) / 2;
        let crop_height = self.height.min(h - top);
        let crop_width = self.width.min(w - left);

        Ok(imageops::crop_imm(&image, left, top, crop_width, crop_height).to_image())
    }
}

/// Crop a window of fixed size at a uniformly random position
///
/// The window always lies inside the image. A window larger than the image
/// along an axis is clamped to the image on that axis.
#[derive(Debug, Clone)]
pub struct RandomCrop<R = ThreadRng> {
    width: u32,
    height: u32,
    rng: R,
}

impl RandomCrop<ThreadRng> {
    /// Create a random crop drawing offsets from the thread-local generator
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_rng(width, height, rand::thread_rng())
    }
}

impl<R: Rng> RandomCrop<R> {
    /// Create a random crop drawing offsets from `rng`
    pub fn with_rng(width: u32, height: u32, rng: R) -> Result<Self> {
        check_size(width, height)?;
        Ok(Self { width, height, rng })
    }

    /// Window width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl<R: Rng> PreprocessingStep<RgbImage> for RandomCrop<R> {
    fn apply(&mut self, image: RgbImage) -> Result<RgbImage> {
        let (w, h) = image.dimensions();
        let crop_width = self.width.min(w);
        let crop_height = self.height.min(h);

        let left = self.rng.gen_range(0..=w - crop_width);
        let top = self.rng.gen_range(0..=h - crop_height);
        tracing::trace!(left, top, crop_width, crop_height, "random crop");

        Ok(imageops::crop_imm(&image, left, top, crop_width, crop_height).to_image())
    }
}
