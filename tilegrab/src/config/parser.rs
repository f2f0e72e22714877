//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::clamp_max_in_flight;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout = parse_positive("download", "timeout", v)?;
        }
        if let Some(v) = section.get("max_attempts") {
            config.download.max_attempts = parse_positive("download", "max_attempts", v)?;
        }
        if let Some(v) = section.get("retry_backoff_ms") {
            config.download.retry_backoff_ms = parse_number("download", "retry_backoff_ms", v)?;
        }
        if let Some(v) = section.get("strategy") {
            let v = v.trim().to_lowercase();
            if v != "safe" && v != "fast" {
                return Err(ConfigFileError::InvalidValue {
                    section: "download".to_string(),
                    key: "strategy".to_string(),
                    value: v,
                    reason: "must be one of: safe, fast".to_string(),
                });
            }
            config.download.strategy = v;
        }
        if let Some(v) = section.get("max_in_flight") {
            let parsed: usize = parse_positive("download", "max_in_flight", v)?;
            config.download.max_in_flight = clamp_max_in_flight(parsed);
        }
        if let Some(v) = section.get("cancel_on_failure") {
            config.download.cancel_on_failure = parse_bool(v);
        }
    }

    // [probe] section
    if let Some(section) = ini.section(Some("probe")) {
        if let Some(v) = section.get("region_size") {
            config.probe.region_size = parse_positive("probe", "region_size", v)?;
        }
        if let Some(v) = section.get("fallback_tile_size") {
            config.probe.fallback_tile_size = parse_positive("probe", "fallback_tile_size", v)?;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 = parse_positive("output", "jpeg_quality", v)?;
            if quality > 100 {
                return Err(ConfigFileError::InvalidValue {
                    section: "output".to_string(),
                    key: "jpeg_quality".to_string(),
                    value: v.to_string(),
                    reason: "must be between 1 and 100".to_string(),
                });
            }
            config.output.jpeg_quality = quality;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a non-negative number, naming the offending key on failure.
fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative integer".to_string(),
        })
}

/// Parse a strictly positive number, naming the offending key on failure.
fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialEq + Default,
{
    let parsed: T = parse_number(section, key, value)?;
    if parsed == T::default() {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(parsed)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
