//! Image information (`info.json`) lookup.

use super::http::AsyncHttpClient;
use super::types::FetchError;
use super::url::info_url;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Largest image, in pixels, we agree to assemble.
///
/// The canvas holds three bytes per pixel, so this bounds one image's
/// buffer at roughly 3 GiB.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 30;

/// Authoritative full resolution of one image, as reported by its service.
///
/// Only the fields needed for planning are deserialized; everything else in
/// the document is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Parses an `info.json` document.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        let info: ImageInfo =
            serde_json::from_slice(body).map_err(|e| FetchError::InvalidInfo(e.to_string()))?;

        if info.width == 0 || info.height == 0 {
            return Err(FetchError::InvalidInfo(format!(
                "degenerate size {}x{}",
                info.width, info.height
            )));
        }

        if info.pixels() > MAX_IMAGE_PIXELS {
            return Err(FetchError::InvalidInfo(format!(
                "size {}x{} exceeds the {} pixel limit",
                info.width, info.height, MAX_IMAGE_PIXELS
            )));
        }

        Ok(info)
    }

    /// Number of pixels in the full image.
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Fetches and parses the `info.json` document of an image service.
pub async fn fetch_image_info<C: AsyncHttpClient>(
    client: &C,
    service_base_url: &str,
    timeout: Duration,
) -> Result<ImageInfo, FetchError> {
    let url = info_url(service_base_url);

    let body = tokio::time::timeout(timeout, client.get(&url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;

    let info = ImageInfo::from_json(&body)?;
    debug!(
        service = service_base_url,
        width = info.width,
        height = info.height,
        "Image info fetched"
    );
    Ok(info)
}
