//! Tile size discovery.
//!
//! Servers often cap the size of a region they will render. Rather than
//! trusting `info.json` tile hints, the prober asks for a large square
//! region and uses whatever edge length the server actually returns.

use crate::config::DownloadConfig;
use crate::iiif::url::region_url;
use crate::iiif::{AsyncHttpClient, FetchError};
use crate::orchestrator::FetchStats;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Discovers the largest square region an image service will serve.
///
/// Results are cached per service base URL for the life of the prober, so
/// a manifest whose pages share one service is probed once. A fallback
/// value is cached as well. Probing never fails: any error yields the
/// configured fallback size.
pub struct TileSizeProber<C: AsyncHttpClient> {
    client: Arc<C>,
    stats: Arc<FetchStats>,
    probe_size: u32,
    fallback_tile_size: u32,
    request_timeout: Duration,
    cache: DashMap<String, u32>,
}

impl<C: AsyncHttpClient> TileSizeProber<C> {
    pub fn new(client: Arc<C>, stats: Arc<FetchStats>) -> Self {
        Self::with_config(client, stats, &DownloadConfig::default())
    }

    pub fn with_config(client: Arc<C>, stats: Arc<FetchStats>, config: &DownloadConfig) -> Self {
        Self {
            client,
            stats,
            probe_size: config.probe_size(),
            fallback_tile_size: config.fallback_tile_size(),
            request_timeout: config.request_timeout(),
            cache: DashMap::new(),
        }
    }

    /// Returns the tile edge to plan with for `service_base_url`.
    pub async fn probe(&self, service_base_url: &str) -> u32 {
        self.probe_with_size(service_base_url, self.probe_size)
            .await
    }

    /// Probes with an explicit requested edge length.
    ///
    /// The result is `min(returned width, returned height, requested)`; a
    /// zero result or any failure gives the fallback size.
    pub async fn probe_with_size(&self, service_base_url: &str, requested: u32) -> u32 {
        if let Some(cached) = self.cache.get(service_base_url) {
            return *cached;
        }

        let tile_size = match self.request_probe(service_base_url, requested).await {
            Ok((width, height)) => {
                let size = width.min(height).min(requested);
                if size == 0 {
                    self.fall_back(service_base_url, "probe returned an empty image")
                } else {
                    info!(
                        service = service_base_url,
                        returned_width = width,
                        returned_height = height,
                        tile_size = size,
                        "Tile size probed"
                    );
                    size
                }
            }
            Err(e) => self.fall_back(service_base_url, &e.to_string()),
        };

        self.cache.insert(service_base_url.to_string(), tile_size);
        tile_size
    }

    /// Number of services probed so far.
    pub fn cached_services(&self) -> usize {
        self.cache.len()
    }

    fn fall_back(&self, service_base_url: &str, reason: &str) -> u32 {
        warn!(
            service = service_base_url,
            reason = reason,
            fallback = self.fallback_tile_size,
            "Tile size probe failed, using fallback"
        );
        self.stats.record_probe_fallback();
        self.fallback_tile_size
    }

    async fn request_probe(&self, service_base_url: &str, requested: u32) -> Result<(u32, u32), FetchError> {
        let url = region_url(service_base_url, 0, 0, requested, requested);
        debug!(url = %url, "Probing tile size");

        let body = tokio::time::timeout(self.request_timeout, self.client.get(&url))
            .await
            .map_err(|_| FetchError::Timeout(self.request_timeout))??;

        if body.is_empty() {
            return Err(FetchError::EmptyBody(url));
        }

        let image = image::load_from_memory(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok((image.width(), image.height()))
    }
}
