//! Height-field extraction from a base-color image.
//!
//! Treats the image's luminance as surface height. A light Gaussian blur
//! runs before gradient estimation; without it, single-pixel noise in the
//! generated base color turns into directionally biased normals.

use crate::buffer::{GrayscaleBuffer, TextureBuffer};
use crate::error::SynthesisError;

/// Default blur sigma in pixels.
pub const DEFAULT_BLUR_SIGMA: f64 = 0.5;

/// Converts a color image into a smoothed, normalized height field.
#[derive(Debug, Clone)]
pub struct HeightFieldSampler {
    /// Gaussian blur sigma in pixels. Zero disables smoothing.
    pub blur_sigma: f64,
}

impl HeightFieldSampler {
    /// Create a sampler with the default smoothing radius.
    pub fn new() -> Self {
        Self {
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }

    /// Set the blur sigma.
    pub fn with_blur_sigma(mut self, sigma: f64) -> Self {
        self.blur_sigma = sigma;
        self
    }

    /// Sample a height field from a color image.
    ///
    /// Output values are in [0.0, 1.0] with the same dimensions as the
    /// input. The only failure mode is a zero-area image.
    pub fn sample(&self, image: &TextureBuffer) -> Result<GrayscaleBuffer, SynthesisError> {
        if image.width == 0 || image.height == 0 {
            return Err(SynthesisError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }

        let mut field = image.to_luminance();
        if self.blur_sigma > 0.0 {
            apply_gaussian_blur(&mut field, self.blur_sigma);
        }

        Ok(field)
    }
}

impl Default for HeightFieldSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a separable Gaussian blur with wrapping sample addressing.
fn apply_gaussian_blur(field: &mut GrayscaleBuffer, sigma: f64) {
    let width = field.width;
    let height = field.height;

    // Kernel extends 3 sigma on each side
    let kernel_size = ((sigma * 3.0).ceil() as usize * 2 + 1).max(3);
    let half_kernel = kernel_size / 2;

    let mut kernel = vec![0.0; kernel_size];
    let mut sum = 0.0;
    for (i, kernel_value) in kernel.iter_mut().enumerate() {
        let x = i as f64 - half_kernel as f64;
        let value = (-x * x / (2.0 * sigma * sigma)).exp();
        *kernel_value = value;
        sum += value;
    }
    for value in &mut kernel {
        *value /= sum;
    }

    // Horizontal pass
    let mut temp = vec![0.0; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (i, kernel_value) in kernel.iter().enumerate() {
                let offset = i as i32 - half_kernel as i32;
                let sample_x = (x as i32 + offset).rem_euclid(width as i32) as u32;
                sum += field.get(sample_x, y) * kernel_value;
            }
            temp[(y * width + x) as usize] = sum;
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (i, kernel_value) in kernel.iter().enumerate() {
                let offset = i as i32 - half_kernel as i32;
                let sample_y = (y as i32 + offset).rem_euclid(height as i32) as u32;
                sum += temp[(sample_y * width + x) as usize] * kernel_value;
            }
            field.set(x, y, sum);
        }
    }
}
