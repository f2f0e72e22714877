//! ImageEncoder trait for turning an assembled canvas into file bytes.
//!
//! # Example
//!
//! ```
//! use tilegrab::assembly::{ImageEncoder, JpegEncoder};
//! use std::sync::Arc;
//!
//! let encoder: Arc<dyn ImageEncoder> = Arc::new(JpegEncoder::new().with_quality(85));
//! assert_eq!(encoder.extension(), "jpg");
//! ```

use crate::config::DEFAULT_JPEG_QUALITY;
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::{ExtendedColorType, ImageEncoder as _, RgbImage};
use thiserror::Error;

/// Errors from encoding an assembled image.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode {format}: {message}")]
    Encoding {
        format: &'static str,
        message: String,
    },
}

/// Trait for output encoding strategies.
///
/// Implementations must be `Send + Sync`; one encoder is shared by the
/// whole batch.
pub trait ImageEncoder: Send + Sync {
    /// Encode an RGB canvas into a complete file.
    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, EncodeError>;

    /// File extension without the dot.
    fn extension(&self) -> &str;

    /// Human-readable name of the format, for logs.
    fn name(&self) -> &str;
}

/// Baseline JPEG encoder.
#[derive(Debug, Clone, Copy)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set output quality (clamped to 1-100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEncoder for JpegEncoder {
    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        ImageJpegEncoder::new_with_quality(&mut out, self.quality)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| EncodeError::Encoding {
                format: "JPEG",
                message: e.to_string(),
            })?;
        Ok(out)
    }

    fn extension(&self) -> &str {
        "jpg"
    }

    fn name(&self) -> &str {
        "JPEG"
    }
}
