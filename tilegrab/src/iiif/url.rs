//! IIIF URL conventions.
//!
//! The Image API addresses a rectangular region as
//! `{service}/{region}/{size}/{rotation}/{quality}.{format}`. We always ask
//! for the region at native size (`full`), unrotated, as `default.jpg`.

/// Suffix appended to an archive URL to reach its manifest.
pub const MANIFEST_SUFFIX: &str = "manifest.json";

/// Path of the image information document below a service base URL.
pub const INFO_SUFFIX: &str = "info.json";

/// Builds the URL for one rectangular region at native resolution.
pub fn region_url(service_base_url: &str, x: u32, y: u32, width: u32, height: u32) -> String {
    format!(
        "{}/{},{},{},{}/full/0/default.jpg",
        service_base_url, x, y, width, height
    )
}

/// Builds the `info.json` URL for an image service.
pub fn info_url(service_base_url: &str) -> String {
    format!("{}/{}", service_base_url, INFO_SUFFIX)
}

/// Builds the manifest URL for an archive URL.
///
/// URLs that already point at a manifest document are returned unchanged.
pub fn manifest_url(archive_url: &str) -> String {
    let trimmed = archive_url.trim().trim_end_matches('/');
    if trimmed.ends_with(MANIFEST_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}/{}", trimmed, MANIFEST_SUFFIX)
    }
}

/// Normalises a service identifier taken from a manifest.
///
/// Strips whitespace, trailing slashes and a trailing `/info.json` so that
/// region URLs can be built by plain concatenation.
pub fn normalize_service_url(raw: &str) -> String {
    let mut url = raw.trim().trim_end_matches('/');
    if let Some(stripped) = url.strip_suffix(INFO_SUFFIX) {
        url = stripped.trim_end_matches('/');
    }
    url.to_string()
}

/// Extracts the archive identifier: the last meaningful path segment.
///
/// Query strings, fragments and a trailing `manifest.json` are ignored.
/// Returns `None` when the URL has no path segment at all.
pub fn archive_segment(archive_url: &str) -> Option<&str> {
    let without_query = archive_url
        .split(['?', '#'])
        .next()
        .unwrap_or(archive_url);
    let without_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);

    let path = without_scheme
        .split_once('/')
        .map(|(_host, path)| path)
        .unwrap_or("");

    path.split('/')
        .filter(|s| !s.is_empty() && *s != MANIFEST_SUFFIX)
        .last()
}
