//! Photo compression for the photo journal.
//!
//! Uploaded photos are decoded, scaled down so the longer side fits the
//! configured maximum and re-encoded as JPEG. Output is a data URL ready to
//! be stored and displayed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::backend::domain::models::JournalError;

const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Target size keeping the aspect ratio, with the longer side at most
/// `max_dimension`. Images already small enough are never upscaled.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    let scale = |short: u32, long: u32| {
        ((short as f64 * max_dimension as f64 / long as f64).round() as u32).max(1)
    };
    if width >= height {
        (max_dimension, scale(height, width))
    } else {
        (scale(width, height), max_dimension)
    }
}

/// Strip an optional `data:...;base64,` prefix and decode
fn decode_base64_payload(input: &str) -> Result<Vec<u8>, JournalError> {
    let payload = match input.trim().strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => input.trim(),
    };
    STANDARD
        .decode(payload)
        .map_err(|e| JournalError::InvalidImage(format!("not valid base64: {}", e)))
}

#[derive(Debug, Clone, Copy)]
pub struct ImageCompressor {
    max_dimension: u32,
    jpeg_quality: u8,
}

impl ImageCompressor {
    pub fn new(max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Compress a base64-encoded image into a JPEG data URL
    pub fn compress_base64(&self, input: &str) -> Result<String, JournalError> {
        let bytes = decode_base64_payload(input)?;
        let jpeg = self.compress(&bytes)?;
        Ok(format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(jpeg)))
    }

    /// Compress raw image file bytes into JPEG bytes
    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, JournalError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| JournalError::InvalidImage(e.to_string()))?;

        let (width, height) = image.dimensions();
        let (target_width, target_height) = scaled_dimensions(width, height, self.max_dimension);
        let resized = if (target_width, target_height) == (width, height) {
            image
        } else {
            image.resize_exact(target_width, target_height, FilterType::Triangle)
        };

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, self.jpeg_quality)
            .encode_image(&resized.to_rgb8())
            .map_err(|e| JournalError::InvalidImage(e.to_string()))?;

        log::debug!(
            "Compressed {}x{} image to {}x{} JPEG ({} bytes)",
            width,
            height,
            target_width,
            target_height,
            output.len()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let image = RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    fn decoded_dimensions(data_url: &str) -> (u32, u32) {
        let bytes = decode_base64_payload(data_url).unwrap();
        image::load_from_memory(&bytes).unwrap().dimensions()
    }

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(scaled_dimensions(1200, 1600, 800), (600, 800));
        assert_eq!(scaled_dimensions(640, 480, 800), (640, 480));
        assert_eq!(scaled_dimensions(800, 800, 800), (800, 800));
        assert_eq!(scaled_dimensions(4000, 1, 800), (800, 1));
    }

    #[test]
    fn test_large_image_is_scaled_down() {
        let compressor = ImageCompressor::new(800, 60);
        let output = compressor.compress_base64(&png_base64(1600, 800)).unwrap();
        assert!(output.starts_with(JPEG_DATA_URL_PREFIX));
        assert_eq!(decoded_dimensions(&output), (800, 400));
    }

    #[test]
    fn test_small_image_keeps_size_and_accepts_data_url() {
        let compressor = ImageCompressor::new(800, 60);
        let input = format!("data:image/png;base64,{}", png_base64(120, 90));
        let output = compressor.compress_base64(&input).unwrap();
        assert_eq!(decoded_dimensions(&output), (120, 90));
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let compressor = ImageCompressor::new(800, 60);
        assert!(matches!(
            compressor.compress_base64("%%%"),
            Err(JournalError::InvalidImage(_))
        ));
        let not_an_image = STANDARD.encode(b"hello");
        assert!(matches!(
            compressor.compress_base64(&not_an_image),
            Err(JournalError::InvalidImage(_))
        ));
    }
}
