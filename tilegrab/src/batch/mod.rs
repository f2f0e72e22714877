//! Batch processing of a whole archive.

mod error;
mod runner;
mod summary;

pub use error::{BatchError, ImageError};
pub use runner::BatchRunner;
pub use summary::{ImageReport, ImageStatus, RunSummary};
