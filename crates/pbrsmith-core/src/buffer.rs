//! Pixel buffers: RGB texture buffers and single-channel height fields.

use crate::color::Color;

/// A 2D RGB texture buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<Color>,
}

impl TextureBuffer {
    /// Create a new texture buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Create a texture buffer from packed 8-bit RGB bytes.
    ///
    /// Returns `None` if `bytes` is not exactly `width * height * 3` long.
    pub fn from_rgb8(bytes: &[u8], width: u32, height: u32) -> Option<Self> {
        if bytes.len() != (width * height * 3) as usize {
            return None;
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| Color::from_rgb8([px[0], px[1], px[2]]))
            .collect();
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        let idx = (y * self.width + x) as usize;
        self.data[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = color;
    }

    /// Convert to a single-channel luminance field.
    pub fn to_luminance(&self) -> GrayscaleBuffer {
        GrayscaleBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|c| c.luminance()).collect(),
        }
    }

    /// Convert to packed 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgb8());
        }
        bytes
    }
}

/// Grayscale buffer (single channel), used as a height field.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (single channel, row-major).
    pub data: Vec<f64>,
}

impl GrayscaleBuffer {
    /// Create a new grayscale buffer filled with a value.
    pub fn new(width: u32, height: u32, fill: f64) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        let idx = (y * self.width + x) as usize;
        self.data[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = value;
    }

    /// Get a pixel with wrapping coordinates.
    #[inline]
    pub fn get_wrapped(&self, x: i32, y: i32) -> f64 {
        let wx = x.rem_euclid(self.width as i32) as u32;
        let wy = y.rem_euclid(self.height as i32) as u32;
        self.get(wx, wy)
    }

    /// Get a pixel with edge-clamped (replicate border) coordinates.
    #[inline]
    pub fn get_clamped(&self, x: i32, y: i32) -> f64 {
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        self.get(cx, cy)
    }
}
