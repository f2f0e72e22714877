//! Logging infrastructure for tilegrab.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `~/.tilegrab/tilegrab.log` by default (cleared on session start)
//! - Also prints to stdout for interactive runs
//! - Configurable via RUST_LOG environment variable; `verbose` forces debug

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file, and
/// sets up dual output to both file and stdout.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<LoggingGuard, io::Error> {
    let (log_dir, file_name) = prepare_log_file(log_file)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Debug when verbose, otherwise `RUST_LOG` or info.
fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Creates the parent directory and truncates the log file.
///
/// Returns the directory and file name for the appender.
fn prepare_log_file(log_file: &Path) -> Result<(PathBuf, PathBuf), io::Error> {
    let file_name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path {} has no file name", log_file.display()),
        )
    })?;

    let log_dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&log_dir)?;
    fs::write(log_dir.join(file_name), "")?;

    Ok((log_dir, PathBuf::from(file_name)))
}
