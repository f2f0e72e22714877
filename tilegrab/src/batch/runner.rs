//! Archive-level batch processing.

use super::error::{BatchError, ImageError};
use super::summary::{ImageReport, ImageStatus, RunSummary};
use crate::assembly::{ImageEncoder, JpegEncoder};
use crate::config::DownloadConfig;
use crate::iiif::{fetch_image_info, AsyncHttpClient};
use crate::manifest::{ImageDescriptor, ManifestWalker, SkipReason};
use crate::orchestrator::{FetchCoordinator, FetchOutcome, FetchStats};
use crate::persist::{archive_id, PersistenceGate};
use crate::tile::{TileFetcher, TileGridPlanner, TileSizeProber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Downloads every image of one archive into an output directory.
///
/// Images are processed one at a time in manifest order. A failing image
/// is recorded and the run continues; only a manifest failure ends the run
/// early. Images whose output already exists are skipped without any
/// network traffic, so re-running after a partial failure only repeats
/// the missing work.
///
/// # Example
///
/// ```ignore
/// use tilegrab::batch::BatchRunner;
/// use tilegrab::config::DownloadConfig;
/// use tilegrab::iiif::AsyncReqwestClient;
/// use std::sync::Arc;
///
/// let client = Arc::new(AsyncReqwestClient::new()?);
/// let runner = BatchRunner::new(client, DownloadConfig::default(), "downloads");
/// let summary = runner.run("https://archive.example.org/iiif/b123").await?;
/// println!("{}", summary);
/// ```
pub struct BatchRunner<C: AsyncHttpClient> {
    client: Arc<C>,
    config: DownloadConfig,
    output_dir: PathBuf,
    encoder: Arc<dyn ImageEncoder>,
    stats: Arc<FetchStats>,
}

impl<C: AsyncHttpClient + 'static> BatchRunner<C> {
    pub fn new(client: Arc<C>, config: DownloadConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            encoder: Arc::new(JpegEncoder::new().with_quality(config.jpeg_quality())),
            config,
            output_dir: output_dir.into(),
            stats: Arc::new(FetchStats::new()),
        }
    }

    /// Replace the output encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Shared counters for this runner, accumulated across runs.
    pub fn stats(&self) -> Arc<FetchStats> {
        Arc::clone(&self.stats)
    }

    /// Processes every image of `archive_url`.
    pub async fn run(&self, archive_url: &str) -> Result<RunSummary, BatchError> {
        let walker = ManifestWalker::new(Arc::clone(&self.client), self.config.request_timeout());
        let manifest = walker.fetch(archive_url).await?;

        let archive_id = archive_id(archive_url);
        let gate = PersistenceGate::new(&self.output_dir, &archive_id, self.encoder.extension());
        let prober = TileSizeProber::with_config(
            Arc::clone(&self.client),
            Arc::clone(&self.stats),
            &self.config,
        );
        let fetcher = TileFetcher::with_config(
            Arc::clone(&self.client),
            Arc::clone(&self.stats),
            &self.config,
        );
        let coordinator = FetchCoordinator::with_config(fetcher, &self.config);

        info!(
            archive = %archive_id,
            images = manifest.images.len(),
            skipped = manifest.skipped.len(),
            strategy = %coordinator.strategy(),
            output = %self.output_dir.display(),
            "Starting batch"
        );

        let mut reports: Vec<ImageReport> = manifest
            .skipped
            .iter()
            .map(|entry| ImageReport {
                sequence_index: entry.sequence_index,
                label: entry.label.clone(),
                status: match entry.reason {
                    SkipReason::MissingService => ImageStatus::MissingService,
                },
            })
            .collect();

        let total = manifest.images.len();
        for (position, descriptor) in manifest.images.iter().enumerate() {
            info!(
                image = position + 1,
                of = total,
                label = %descriptor.label,
                "Processing image"
            );

            let status = if gate.is_complete(descriptor).await {
                let path = gate.output_path(descriptor);
                info!(path = %path.display(), "Already downloaded, skipping");
                ImageStatus::AlreadyComplete { path }
            } else {
                match self
                    .process_image(descriptor, &gate, &prober, &coordinator)
                    .await
                {
                    Ok(path) => ImageStatus::Succeeded { path },
                    Err(e) => {
                        warn!(label = %descriptor.label, error = %e, "Image failed");
                        ImageStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            };

            reports.push(ImageReport {
                sequence_index: descriptor.sequence_index,
                label: descriptor.label.clone(),
                status,
            });
        }

        reports.sort_by_key(|r| r.sequence_index);

        let summary = RunSummary {
            archive_id,
            reports,
            stats: self.stats.snapshot(),
        };

        info!(
            succeeded = summary.succeeded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            tiles = summary.stats.tiles_fetched,
            tile_failures = summary.stats.tiles_failed,
            retries = summary.stats.retries,
            bytes = summary.stats.bytes_downloaded,
            "Batch finished"
        );

        Ok(summary)
    }

    /// Info lookup, probe, plan, fetch, assemble and commit for one image.
    async fn process_image(
        &self,
        descriptor: &ImageDescriptor,
        gate: &PersistenceGate,
        prober: &TileSizeProber<C>,
        coordinator: &FetchCoordinator<C>,
    ) -> Result<PathBuf, ImageError> {
        let service = descriptor.service_base_url.as_str();

        let image_info = fetch_image_info(self.client.as_ref(), service, self.config.request_timeout())
            .await
            .map_err(ImageError::Info)?;

        let tile_size = prober.probe(service).await;
        let plan = TileGridPlanner::new(service).plan(image_info.width, image_info.height, tile_size);

        info!(
            width = image_info.width,
            height = image_info.height,
            tile_size = tile_size,
            tiles = plan.len(),
            "Image planned"
        );

        let report = coordinator
            .run(image_info.width, image_info.height, plan, self.encoder.as_ref())
            .await?;

        match report.outcome {
            FetchOutcome::Complete(ref bytes) => Ok(gate.commit(descriptor, bytes).await?),
            FetchOutcome::Aborted { .. } => Err(ImageError::Aborted(
                report.abort_reason().unwrap_or_default(),
            )),
        }
    }
}
