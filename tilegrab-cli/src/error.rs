//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilegrab::batch::BatchError;
use tilegrab::config::ConfigFileError;
use tilegrab::iiif::FetchError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Async runtime could not be started
    Runtime(std::io::Error),
    /// HTTP client could not be built
    HttpClient(FetchError),
    /// Manifest could not be fetched or parsed
    Batch(BatchError),
    /// The run finished but some images failed
    ImagesFailed { failed: usize, total: usize },
    /// Image service lookup failed
    Probe(FetchError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Batch(_) => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. The archive URL is the archive page, not an image URL");
                eprintln!("  2. <archive URL>/manifest.json opens in a browser");
            }
            CliError::ImagesFailed { .. } => {
                eprintln!();
                eprintln!("Run the same command again to retry only the failed images.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Fix the value in {} or delete the file to use defaults.",
                    tilegrab::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Batch(e) => write!(f, "Download failed: {}", e),
            CliError::ImagesFailed { failed, total } => {
                write!(f, "{} of {} images failed", failed, total)
            }
            CliError::Probe(e) => write!(f, "Image service lookup failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Batch(e) => Some(e),
            CliError::Probe(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        CliError::Batch(e)
    }
}
