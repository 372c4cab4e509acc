//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so the same buffer always encodes to the
//! same bytes, which the artifact hashes and test fixtures rely on.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::buffer::TextureBuffer;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Fixed for determinism.
    pub compression: Compression,
    /// Filter type. `NoFilter` keeps the byte stream independent of the
    /// encoder's adaptive heuristics.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGB texture buffer to a PNG file.
pub fn write_rgb(buffer: &TextureBuffer, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_rgb_to_writer(buffer, writer, config)
}

/// Write an RGB texture buffer to any writer.
pub fn write_rgb_to_writer<W: Write>(
    buffer: &TextureBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;

    let data = buffer.to_rgb8();
    png_writer.write_image_data(&data)?;

    Ok(())
}

/// Write RGB to a Vec<u8> and return the BLAKE3 hash of the encoded bytes.
pub fn write_rgb_to_vec_with_hash(
    buffer: &TextureBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgb_to_writer(buffer, &mut data, config)?;
    let hash = blake3::hash(&data).to_hex().to_string();
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_rgb_deterministic() {
        let mut buffer = TextureBuffer::new(64, 64, Color::black());
        for y in 0..64 {
            for x in 0..64 {
                let r = x as f64 / 63.0;
                let g = y as f64 / 63.0;
                buffer.set(x, y, Color::rgb(r, g, 0.5));
            }
        }

        let config = PngConfig::default();

        let (data1, hash1) = write_rgb_to_vec_with_hash(&buffer, &config).unwrap();
        let (data2, hash2) = write_rgb_to_vec_with_hash(&buffer, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn test_write_rgb_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let buffer = TextureBuffer::new(8, 8, Color::gray(0.5));
        write_rgb(&buffer, &path, &PngConfig::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let (expected, _) = write_rgb_to_vec_with_hash(&buffer, &PngConfig::default()).unwrap();
        assert_eq!(bytes, expected);
    }
}
