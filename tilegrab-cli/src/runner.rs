//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, runtime and HTTP
//! client creation to reduce duplication across command handlers.

use crate::error::CliError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tilegrab::config::ConfigFile;
use tilegrab::iiif::AsyncReqwestClient;
use tilegrab::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("tilegrab v{}", tilegrab::VERSION);
        info!("tilegrab CLI: {} command", command);
        info!("Log file: {}", self.config.logging.file.display());
    }

    /// Create the HTTP client shared by one run.
    pub fn create_client(&self, timeout: Duration) -> Result<Arc<AsyncReqwestClient>, CliError> {
        AsyncReqwestClient::with_timeout(timeout)
            .map(Arc::new)
            .map_err(CliError::HttpClient)
    }

    /// Drive a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
