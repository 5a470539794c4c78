//! Image encoding seam used when a product is created.
//!
//! Picking images belongs to the UI layer. The engine only asks an
//! [`ImageEncoder`] to turn the raw bytes it was handed into the stored
//! representation, at a quality level from [`EngineConfig`](crate::EngineConfig).
//! The default, [`CompressJpeg`], decodes any supported format and stores it
//! as JPEG.

use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;
use tracing::debug;

use cartwheel_core::ImageData;

/// Default compression quality for stored product images.
pub const DEFAULT_IMAGE_QUALITY: f32 = 0.8;

/// Errors from image encoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImageError {
    /// Quality outside `0.0..=1.0`.
    #[error("image quality must be within 0.0..=1.0 (got {0})")]
    InvalidQuality(f32),

    /// No bytes were supplied.
    #[error("image payload is empty")]
    Empty,

    /// The encoder rejected the payload.
    #[error("image encoding failed: {0}")]
    Encoding(String),
}

/// Converts picked image bytes into their stored encoding.
pub trait ImageEncoder: Send + Sync {
    /// Encode `raw` at `quality` (0.0 = smallest, 1.0 = best).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the payload or quality is unusable.
    fn encode(&self, raw: &[u8], quality: f32) -> Result<ImageData, ImageError>;
}

/// Decodes PNG or JPEG input and re-encodes it as JPEG at the requested
/// quality. Alpha is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressJpeg;

impl ImageEncoder for CompressJpeg {
    fn encode(&self, raw: &[u8], quality: f32) -> Result<ImageData, ImageError> {
        validate_quality(quality)?;
        if raw.is_empty() {
            return Err(ImageError::Empty);
        }

        let decoded =
            image::load_from_memory(raw).map_err(|e| ImageError::Encoding(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, jpeg_quality(quality))
            .encode_image(&rgb)
            .map_err(|e| ImageError::Encoding(e.to_string()))?;

        debug!(
            width = rgb.width(),
            height = rgb.height(),
            raw_len = raw.len(),
            encoded_len = encoded.len(),
            "Compressed image"
        );
        Ok(ImageData::new(encoded))
    }
}

/// Map `0.0..=1.0` onto the JPEG scale `1..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn jpeg_quality(quality: f32) -> u8 {
    // quality is validated, so the product lies within 0.0..=100.0
    ((quality * 100.0).round() as u8).max(1)
}

/// Stores bytes exactly as received, without decoding them.
///
/// Opt-in for callers whose UI layer already produced a compressed format.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreAsIs;

impl ImageEncoder for StoreAsIs {
    fn encode(&self, raw: &[u8], quality: f32) -> Result<ImageData, ImageError> {
        validate_quality(quality)?;
        if raw.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(ImageData::new(raw.to_vec()))
    }
}

/// Check that a quality level lies within `0.0..=1.0`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidQuality`] otherwise, including for NaN.
pub fn validate_quality(quality: f32) -> Result<(), ImageError> {
    if (0.0..=1.0).contains(&quality) {
        Ok(())
    } else {
        Err(ImageError::InvalidQuality(quality))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    use super::*;

    /// A PNG with enough high-frequency detail for JPEG quality to matter.
    fn noisy_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let seed = (x * 7919 + y * 104_729) ^ (x * y);
            Rgb([
                (seed % 251) as u8,
                ((seed / 3) % 241) as u8,
                ((seed / 7) % 239) as u8,
            ])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_compress_reencodes_as_jpeg() {
        let raw = noisy_png(64, 64);
        let data = CompressJpeg.encode(&raw, DEFAULT_IMAGE_QUALITY).unwrap();
        assert_ne!(data.as_bytes(), raw.as_slice());
        assert_eq!(&data.as_bytes()[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(data.as_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn test_lower_quality_gives_smaller_payload() {
        let raw = noisy_png(64, 64);
        let best = CompressJpeg.encode(&raw, 1.0).unwrap();
        let worst = CompressJpeg.encode(&raw, 0.05).unwrap();
        assert!(
            worst.len() < best.len(),
            "q0.05 = {} bytes, q1.0 = {} bytes",
            worst.len(),
            best.len()
        );
    }

    #[test]
    fn test_compress_rejects_non_image_bytes() {
        let err = CompressJpeg.encode(b"definitely not an image", 0.8).unwrap_err();
        assert!(matches!(err, ImageError::Encoding(_)));
    }

    #[test]
    fn test_compress_checks_quality_and_emptiness_first() {
        assert_eq!(CompressJpeg.encode(&[], 0.5), Err(ImageError::Empty));
        assert_eq!(
            CompressJpeg.encode(&noisy_png(4, 4), 2.0),
            Err(ImageError::InvalidQuality(2.0))
        );
    }

    #[test]
    fn test_zero_quality_is_still_encodable() {
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(1.0), 100);
        assert!(CompressJpeg.encode(&noisy_png(8, 8), 0.0).is_ok());
    }

    #[test]
    fn test_store_as_is_keeps_bytes() {
        let data = StoreAsIs.encode(&[1, 2, 3], DEFAULT_IMAGE_QUALITY).unwrap();
        assert_eq!(data.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert_eq!(StoreAsIs.encode(&[], 0.5), Err(ImageError::Empty));
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        assert_eq!(validate_quality(1.5), Err(ImageError::InvalidQuality(1.5)));
        assert!(validate_quality(-0.1).is_err());
        assert!(validate_quality(f32::NAN).is_err());
        assert!(validate_quality(0.0).is_ok());
        assert!(validate_quality(1.0).is_ok());
    }
}
