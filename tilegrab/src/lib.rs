//! tilegrab - Tiled IIIF image acquisition and reassembly
//!
//! Downloads every image of a IIIF archive at full resolution. Each image
//! is fetched as a grid of tiles no larger than its server will render,
//! pasted back together and saved only when every tile arrived.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilegrab::batch::BatchRunner;
//! use tilegrab::config::DownloadConfig;
//! use tilegrab::iiif::AsyncReqwestClient;
//! use std::sync::Arc;
//!
//! let client = Arc::new(AsyncReqwestClient::new()?);
//! let runner = BatchRunner::new(client, DownloadConfig::default(), "downloads");
//! let summary = runner.run("https://archive.example.org/iiif/b123").await?;
//! println!("{}", summary);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ManifestWalker ─► ImageDescriptor ─► PersistenceGate::is_complete?
//!                                          │ no
//!                                          ▼
//!                  info.json ─► TileSizeProber ─► TileGridPlanner
//!                                                     │
//!                                                     ▼
//!                              FetchCoordinator ─► ImageAssembler ─► PersistenceGate::commit
//! ```

pub mod assembly;
pub mod batch;
pub mod config;
pub mod iiif;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod persist;
pub mod tile;

/// Version of the tilegrab library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
