//! Tangent-space normal map derivation from a height field.

use crate::buffer::{GrayscaleBuffer, TextureBuffer};
use crate::color::Color;
use crate::error::SynthesisError;

/// Default bump strength. Higher values exaggerate relief.
pub const DEFAULT_STRENGTH: f64 = 3.0;

/// Derives a normal map from a height field via central differences.
///
/// Border gradients use edge-clamped (replicate) sampling so the map is
/// well-defined at image boundaries. Encoding is the standard tangent-space
/// convention: each unit-normal component maps from [-1, 1] to [0, 255] via
/// `round((n + 1) * 127.5)`, channel order R=x, G=y, B=z. A flat field
/// encodes as (128, 128, 255).
#[derive(Debug, Clone)]
pub struct NormalMapSynthesizer {
    /// Bump strength; the derived surface z component is `1 / strength`.
    pub strength: f64,
}

impl NormalMapSynthesizer {
    /// Create a synthesizer with the default strength.
    pub fn new() -> Self {
        Self {
            strength: DEFAULT_STRENGTH,
        }
    }

    /// Set the bump strength.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Synthesize an RGB normal map with the same dimensions as the field.
    pub fn synthesize(&self, field: &GrayscaleBuffer) -> Result<TextureBuffer, SynthesisError> {
        if self.strength <= 0.0 {
            return Err(SynthesisError::InvalidStrength(self.strength));
        }
        if field.width == 0 || field.height == 0 {
            return Err(SynthesisError::EmptyImage {
                width: field.width,
                height: field.height,
            });
        }

        let width = field.width;
        let height = field.height;
        let dz = 1.0 / self.strength;
        let mut buffer = TextureBuffer::new(width, height, Color::rgb(0.5, 0.5, 1.0));

        for y in 0..height {
            for x in 0..width {
                let xi = x as i32;
                let yi = y as i32;

                // Central differences over the edge-clamped field
                let dx = (field.get_clamped(xi + 1, yi) - field.get_clamped(xi - 1, yi)) * 0.5;
                let dy = (field.get_clamped(xi, yi + 1) - field.get_clamped(xi, yi - 1)) * 0.5;

                let len = (dx * dx + dy * dy + dz * dz).sqrt();
                let nx = dx / len;
                let ny = dy / len;
                let nz = dz / len;

                // Remap [-1, 1] to [0, 1]; the 8-bit encode rounds this to
                // round((n + 1) * 127.5)
                buffer.set(
                    x,
                    y,
                    Color::rgb((nx + 1.0) * 0.5, (ny + 1.0) * 0.5, (nz + 1.0) * 0.5),
                );
            }
        }

        Ok(buffer)
    }
}

impl Default for NormalMapSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
