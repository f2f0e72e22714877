//! Single-tile fetching with retry.

use super::spec::{TileResult, TileSpec};
use crate::config::DownloadConfig;
use crate::iiif::{AsyncHttpClient, FetchError};
use crate::orchestrator::FetchStats;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Fetches one tile region and decodes it into an RGB bitmap.
///
/// Every attempt is bounded by the request timeout. Retryable failures
/// (connection errors, timeouts, 5xx, 408/429, truncated bodies) are retried
/// up to `max_attempts` in total with exponential backoff; permanent failures
/// stop immediately. Fetching never panics or unwinds: the outcome is always
/// a [`TileResult`].
pub struct TileFetcher<C: AsyncHttpClient> {
    client: Arc<C>,
    stats: Arc<FetchStats>,
    request_timeout: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl<C: AsyncHttpClient> Clone for TileFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            stats: Arc::clone(&self.stats),
            request_timeout: self.request_timeout,
            max_attempts: self.max_attempts,
            retry_backoff: self.retry_backoff,
        }
    }
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    /// Creates a fetcher with the default timeout and retry policy.
    pub fn new(client: Arc<C>, stats: Arc<FetchStats>) -> Self {
        Self::with_config(client, stats, &DownloadConfig::default())
    }

    pub fn with_config(client: Arc<C>, stats: Arc<FetchStats>, config: &DownloadConfig) -> Self {
        Self {
            client,
            stats,
            request_timeout: config.request_timeout(),
            max_attempts: config.max_attempts(),
            retry_backoff: config.retry_backoff(),
        }
    }

    /// Fetches, decodes and validates one tile.
    ///
    /// A decoded tile whose size differs from the spec is a failure; the
    /// assembler never receives a tile that does not fit its slot.
    pub async fn fetch(&self, spec: TileSpec) -> TileResult {
        let mut last_error = FetchError::Request("no attempt made".to_string());

        for attempt in 1..=self.max_attempts {
            trace!(url = %spec.url, attempt = attempt, "Tile fetch attempt");

            match self.fetch_once(&spec).await {
                Ok((bitmap, bytes)) => {
                    self.stats.record_tile_success(bytes);
                    debug!(
                        x = spec.x,
                        y = spec.y,
                        bytes = bytes,
                        attempt = attempt,
                        "Tile fetched"
                    );
                    return TileResult::success(spec, bitmap);
                }
                Err(e) => {
                    let retryable = e.is_retryable();
                    warn!(
                        url = %spec.url,
                        attempt = attempt,
                        error = %e,
                        retryable = retryable,
                        "Tile fetch error"
                    );
                    last_error = e;
                    if !retryable || attempt == self.max_attempts {
                        break;
                    }
                    self.stats.record_retry();
                    tokio::time::sleep(self.backoff_for(attempt)).await;
                }
            }
        }

        self.stats.record_tile_failure();
        TileResult::failure(spec, last_error)
    }

    /// Delay after the `attempt`-th failed attempt (1-based).
    fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.retry_backoff.saturating_mul(1 << exponent)
    }

    async fn fetch_once(&self, spec: &TileSpec) -> Result<(RgbImage, usize), FetchError> {
        let body = tokio::time::timeout(self.request_timeout, self.client.get(&spec.url))
            .await
            .map_err(|_| FetchError::Timeout(self.request_timeout))??;

        if body.is_empty() {
            return Err(FetchError::EmptyBody(spec.url.clone()));
        }

        let bitmap = image::load_from_memory(&body)
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .to_rgb8();

        if bitmap.width() != spec.width || bitmap.height() != spec.height {
            return Err(FetchError::DimensionMismatch {
                expected_width: spec.width,
                expected_height: spec.height,
                actual_width: bitmap.width(),
                actual_height: bitmap.height(),
            });
        }

        Ok((bitmap, body.len()))
    }
}
