//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use std::time::Duration;
use tilegrab::config::{ConfigFile, DownloadConfig};
use tilegrab::orchestrator::FetchStrategy;

/// Fetch strategy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum StrategyArg {
    /// One tile at a time, stop at the first failure
    Safe,
    /// Bounded parallel fetching, all tiles awaited
    Fast,
}

/// Command-line overrides for the download configuration.
#[derive(Debug, Default, Clone)]
pub struct DownloadOverrides {
    pub strategy: Option<StrategyArg>,
    pub max_in_flight: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub attempts: Option<u32>,
    pub cancel_on_failure: bool,
    pub quality: Option<u8>,
}

/// Merge CLI overrides onto the config file settings.
///
/// `--max-in-flight` only matters for the fast strategy; with `safe` it is
/// ignored.
pub fn resolve_download_config(overrides: &DownloadOverrides, config: &ConfigFile) -> DownloadConfig {
    let mut download = config.to_download_config();

    let pool = overrides
        .max_in_flight
        .unwrap_or(config.download.max_in_flight);
    let strategy = match (overrides.strategy, download.strategy()) {
        (Some(StrategyArg::Safe), _) => FetchStrategy::Sequential,
        (Some(StrategyArg::Fast), _) | (None, FetchStrategy::Concurrent { .. }) => {
            FetchStrategy::concurrent(pool)
        }
        (None, FetchStrategy::Sequential) => FetchStrategy::Sequential,
    };
    download = download.with_strategy(strategy);

    if let Some(secs) = overrides.timeout_secs {
        download = download.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(attempts) = overrides.attempts {
        download = download.with_max_attempts(attempts);
    }
    if overrides.cancel_on_failure {
        download = download.with_cancel_on_failure(true);
    }
    if let Some(quality) = overrides.quality {
        download = download.with_jpeg_quality(quality);
    }

    download
}
