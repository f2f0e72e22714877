//! Manifest data model and errors.

use crate::iiif::FetchError;
use thiserror::Error;

/// One image of an archive, in manifest order.
///
/// `sequence_index` counts every canvas in the manifest, including canvases
/// that were skipped, so output names stay stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub service_base_url: String,
    pub label: String,
    pub sequence_index: usize,
}

/// Why a manifest entry produced no descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingService,
}

/// A manifest entry that was dropped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub sequence_index: usize,
    pub label: String,
    pub reason: SkipReason,
}

/// Result of parsing a manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    pub images: Vec<ImageDescriptor>,
    pub skipped: Vec<SkippedEntry>,
}

impl ParsedManifest {
    /// Number of canvases found, usable or not.
    pub fn entries(&self) -> usize {
        self.images.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries() == 0
    }
}

/// Errors that make a manifest unusable. Fatal for the run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to fetch manifest {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("manifest {url} is not valid JSON: {message}")]
    Json { url: String, message: String },

    #[error("manifest {url} is not a JSON object")]
    NotAnObject { url: String },
}
