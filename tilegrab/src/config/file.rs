//! Configuration file handling for ~/.tilegrab/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;

use super::DownloadConfig;
use crate::orchestrator::FetchStrategy;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.tilegrab/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Builds the library download configuration from file settings.
    ///
    /// The strategy string has already been validated by the parser; an
    /// unknown value here falls back to the sequential strategy.
    pub fn to_download_config(&self) -> DownloadConfig {
        let strategy = match self.download.strategy.as_str() {
            "fast" => FetchStrategy::concurrent(self.download.max_in_flight),
            _ => FetchStrategy::Sequential,
        };

        DownloadConfig::new()
            .with_request_timeout(Duration::from_secs(self.download.timeout))
            .with_max_attempts(self.download.max_attempts)
            .with_retry_backoff(Duration::from_millis(self.download.retry_backoff_ms))
            .with_strategy(strategy)
            .with_cancel_on_failure(self.download.cancel_on_failure)
            .with_probe_size(self.probe.region_size)
            .with_fallback_tile_size(self.probe.fallback_tile_size)
            .with_jpeg_quality(self.output.jpeg_quality)
    }
}

/// Get the path to the config directory (~/.tilegrab).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilegrab")
}

/// Get the path to the config file (~/.tilegrab/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
