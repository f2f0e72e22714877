//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Tile download settings
    pub download: DownloadSettings,
    /// Tile-size probing settings
    pub probe: ProbeSettings,
    /// Output settings
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Download configuration.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Attempts per tile, including the first
    pub max_attempts: u32,
    /// Retry backoff base delay in milliseconds
    pub retry_backoff_ms: u64,
    /// Fetch strategy: "safe" or "fast"
    pub strategy: String,
    /// In-flight tile requests for the "fast" strategy
    pub max_in_flight: usize,
    /// Stop dispatching new tiles after the first failure ("fast" only)
    pub cancel_on_failure: bool,
}

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Edge length of the probe region in pixels
    pub region_size: u32,
    /// Tile edge used when probing fails
    pub fallback_tile_size: u32,
}

/// Output configuration.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Destination directory for assembled images
    pub directory: PathBuf,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
