//! Archive manifest discovery.
//!
//! Turns `{archive_url}/manifest.json` into the ordered list of images to
//! download. Both IIIF Presentation 2 (`sequences`) and 3 (`items`) shapes
//! are accepted.

mod schema;
mod types;
mod walker;

pub use schema::{label_text, ManifestSchema};
pub use types::{ImageDescriptor, ManifestError, ParsedManifest, SkipReason, SkippedEntry};
pub use walker::ManifestWalker;
