//! Flattened capture encoding and persistence
//!
//! This module contains:
//! - Raster encoding of the flattened surface (JPEG or PNG)
//! - The persistence sink contract and a directory-backed sink

pub mod sink;

use std::io;

use chrono::{DateTime, Utc};
use image::RgbaImage;

use crate::config::{ExportFormat, ExportOptions};
use crate::error::EditorError;

pub use sink::{DirectorySink, MeasureRecord, PersistenceSink};

/// Result of a successful flatten: encoded raster plus annotation count
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedCapture {
    /// Encoded raster bytes
    pub image: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub annotation_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Encode a flattened image with the configured format
pub fn encode(img: &RgbaImage, options: &ExportOptions) -> Result<Vec<u8>, EditorError> {
    let mut buffer = Vec::new();
    let written = match options.format {
        ExportFormat::Png => write_png(&mut buffer, img),
        ExportFormat::Jpeg => write_jpeg(&mut buffer, img, options.jpeg_quality()),
    };
    written.map_err(EditorError::Encode)?;
    log::debug!(
        "Encoded {}x{} {:?} capture ({} bytes)",
        img.width(),
        img.height(),
        options.format,
        buffer.len()
    );
    Ok(buffer)
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), String> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(|e| e.to_string())?;
    writer
        .write_image_data(image.as_raw())
        .map_err(|e| e.to_string())
}

/// JPEG has no alpha channel, so transparent areas are composited on black
fn write_jpeg<W: io::Write>(mut w: W, image: &RgbaImage, quality: u8) -> Result<(), String> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut w, quality);
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(8, 6, image::Rgba([200, 100, 50, 255]))
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let options = ExportOptions {
            format: ExportFormat::Png,
            quality: 0.5,
        };
        let bytes = encode(&sample(), &options).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_encode_jpeg_has_jpeg_signature() {
        let bytes = encode(&sample(), &ExportOptions::default()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }
}
