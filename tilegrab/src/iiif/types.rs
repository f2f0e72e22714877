//! Error types for IIIF image-service requests.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to an image service.
///
/// Every failure mode of a single request ends up here so that callers can
/// carry it around as data instead of unwinding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, reset, TLS)
    #[error("request failed: {0}")]
    Request(String),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// No response within the per-request timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Response body was empty
    #[error("empty response body from {0}")]
    EmptyBody(String),

    /// Response body could not be decoded as an image
    #[error("undecodable image payload: {0}")]
    Decode(String),

    /// Decoded tile does not have the requested dimensions
    #[error("tile is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// `info.json` was missing required fields or reported a degenerate size
    #[error("invalid image info: {0}")]
    InvalidInfo(String),
}

impl FetchError {
    /// Returns true if repeating the same request may succeed.
    ///
    /// Client errors (4xx) are permanent except for 408 and 429. A tile with
    /// the wrong dimensions is a server capability problem and will not
    /// change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => {
                !(400..500).contains(status) || *status == 408 || *status == 429
            }
            FetchError::DimensionMismatch { .. } | FetchError::InvalidInfo(_) => false,
            FetchError::Request(_)
            | FetchError::Timeout(_)
            | FetchError::EmptyBody(_)
            | FetchError::Decode(_) => true,
        }
    }
}
