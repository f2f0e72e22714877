//! Batch and per-image errors.

use crate::assembly::AssemblyError;
use crate::iiif::FetchError;
use crate::manifest::ManifestError;
use crate::persist::PersistError;
use thiserror::Error;

/// Failure of a whole run. Only the manifest can fail a run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Failure of one image. The batch records it and moves on.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image info lookup failed: {0}")]
    Info(#[source] FetchError),

    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("download aborted: {0}")]
    Aborted(String),

    #[error("could not save image: {0}")]
    Commit(#[from] PersistError),
}
