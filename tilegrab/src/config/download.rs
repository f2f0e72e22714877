//! Download/orchestrator configuration.

use std::time::Duration;

use super::defaults::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_ATTEMPTS, DEFAULT_PROBE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_MS, FALLBACK_TILE_SIZE,
};
use crate::orchestrator::FetchStrategy;

/// Configuration for probing, tile fetching and assembly.
///
/// Groups all parameters needed by one batch run, providing sensible
/// defaults while allowing customization.
///
/// # Example
///
/// ```
/// use tilegrab::config::DownloadConfig;
/// use tilegrab::orchestrator::FetchStrategy;
/// use std::time::Duration;
///
/// // Using defaults
/// let config = DownloadConfig::default();
/// assert_eq!(config.max_attempts(), 2);
/// assert_eq!(config.strategy(), FetchStrategy::Sequential);
///
/// // Custom configuration
/// let config = DownloadConfig::new()
///     .with_request_timeout(Duration::from_secs(60))
///     .with_strategy(FetchStrategy::concurrent(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    request_timeout: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
    strategy: FetchStrategy,
    cancel_on_failure: bool,
    probe_size: u32,
    fallback_tile_size: u32,
    jpeg_quality: u8,
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout applied to every single request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of attempts per tile, including the first one.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the base delay between attempts. Doubles after every retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set the fetch strategy used for every image.
    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stop dispatching new tiles once any tile has failed.
    ///
    /// Only affects the concurrent strategy; requests already in flight
    /// always run to completion.
    pub fn with_cancel_on_failure(mut self, cancel: bool) -> Self {
        self.cancel_on_failure = cancel;
        self
    }

    /// Set the edge length of the probe region.
    pub fn with_probe_size(mut self, size: u32) -> Self {
        self.probe_size = size.max(1);
        self
    }

    /// Set the tile edge used when probing fails.
    pub fn with_fallback_tile_size(mut self, size: u32) -> Self {
        self.fallback_tile_size = size.max(1);
        self
    }

    /// Set the JPEG quality of assembled images (clamped to 1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    pub fn cancel_on_failure(&self) -> bool {
        self.cancel_on_failure
    }

    pub fn probe_size(&self) -> u32 {
        self.probe_size
    }

    pub fn fallback_tile_size(&self) -> u32 {
        self.fallback_tile_size
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            strategy: FetchStrategy::default(),
            cancel_on_failure: false,
            probe_size: DEFAULT_PROBE_SIZE,
            fallback_tile_size: FALLBACK_TILE_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
