//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;

// =============================================================================
// Concurrency limits
// =============================================================================

/// Hard upper bound on in-flight tile requests for one image.
/// Institutional IIIF servers start refusing or stalling well before this.
pub const MAX_IN_FLIGHT_CAP: usize = 32;

/// Default in-flight tile requests for the concurrent strategy.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Clamps an in-flight limit to `[1, MAX_IN_FLIGHT_CAP]` and logs if clamped.
pub fn clamp_max_in_flight(value: usize) -> usize {
    let clamped = value.clamp(1, MAX_IN_FLIGHT_CAP);
    if clamped != value {
        tracing::warn!(
            requested = value,
            max = MAX_IN_FLIGHT_CAP,
            "max_in_flight out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

// =============================================================================
// Request defaults
// =============================================================================

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default attempts per tile (first try plus one retry).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default retry backoff base delay in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

// =============================================================================
// Probe defaults
// =============================================================================

/// Edge length of the square test region requested when probing.
pub const DEFAULT_PROBE_SIZE: u32 = 2000;

/// Tile edge used when probing fails.
pub const FALLBACK_TILE_SIZE: u32 = 1024;

// =============================================================================
// Output defaults
// =============================================================================

/// Default JPEG quality for assembled images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default strategy name.
pub const DEFAULT_STRATEGY: &str = "safe";

/// Default output directory, relative to the working directory.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// Default log file location.
pub fn default_log_file() -> PathBuf {
    super::file::config_directory().join("tilegrab.log")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            download: DownloadSettings {
                timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
                strategy: DEFAULT_STRATEGY.to_string(),
                max_in_flight: DEFAULT_MAX_IN_FLIGHT,
                cancel_on_failure: false,
            },
            probe: ProbeSettings {
                region_size: DEFAULT_PROBE_SIZE,
                fallback_tile_size: FALLBACK_TILE_SIZE,
            },
            output: OutputSettings {
                directory: default_output_dir(),
                jpeg_quality: DEFAULT_JPEG_QUALITY,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
