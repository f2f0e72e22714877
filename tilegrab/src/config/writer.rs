//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::MAX_IN_FLIGHT_CAP;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let cancel_on_failure = if config.download.cancel_on_failure {
        "true"
    } else {
        "false"
    };

    format!(
        r#"# tilegrab configuration

[download]
# Per-request timeout in seconds
timeout = {timeout}
# Attempts per tile, including the first request
max_attempts = {max_attempts}
# Base delay between attempts in milliseconds (doubles each retry)
retry_backoff_ms = {retry_backoff_ms}
# safe: one tile at a time, stop at the first failure
# fast: bounded pool of concurrent requests
strategy = {strategy}
# In-flight requests for the fast strategy (1-{cap})
max_in_flight = {max_in_flight}
# Stop dispatching new tiles once one has failed (fast strategy)
cancel_on_failure = {cancel_on_failure}

[probe]
# Edge length of the square region used to discover the server's tile limit
region_size = {region_size}
# Tile edge used when probing fails
fallback_tile_size = {fallback_tile_size}

[output]
directory = {directory}
# JPEG quality (1-100)
jpeg_quality = {jpeg_quality}

[logging]
file = {log_file}
"#,
        timeout = config.download.timeout,
        max_attempts = config.download.max_attempts,
        retry_backoff_ms = config.download.retry_backoff_ms,
        strategy = config.download.strategy,
        cap = MAX_IN_FLIGHT_CAP,
        max_in_flight = config.download.max_in_flight,
        cancel_on_failure = cancel_on_failure,
        region_size = config.probe.region_size,
        fallback_tile_size = config.probe.fallback_tile_size,
        directory = path_to_string(&config.output.directory),
        jpeg_quality = config.output.jpeg_quality,
        log_file = path_to_string(&config.logging.file),
    )
}

/// Render a path, collapsing the home directory back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
