//! Configuration types for tilegrab components.
//!
//! Two layers, kept separate:
//!
//! - [`DownloadConfig`]: the typed, in-memory configuration consumed by the
//!   library (prober, fetcher, coordinator, encoder).
//! - [`ConfigFile`]: the user's `~/.tilegrab/config.ini`, parsed with
//!   `rust-ini` and converted with [`ConfigFile::to_download_config`].
//!
//! # Example
//!
//! ```
//! use tilegrab::config::{ConfigFile, DownloadConfig};
//!
//! let download_config = DownloadConfig::default();
//! let from_file = ConfigFile::default().to_download_config();
//! assert_eq!(download_config, from_file);
//! ```

mod defaults;
mod download;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    clamp_max_in_flight, default_log_file, default_output_dir, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_IN_FLIGHT, DEFAULT_PROBE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_MS, FALLBACK_TILE_SIZE, MAX_IN_FLIGHT_CAP,
};
pub use download::DownloadConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, DownloadSettings, LoggingSettings, OutputSettings, ProbeSettings};
