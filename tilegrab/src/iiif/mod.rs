//! IIIF image-service access.
//!
//! This module owns everything that speaks HTTP to an image server: the
//! injectable client trait, the URL conventions of the Image API and the
//! `info.json` lookup used to learn an image's full resolution.
//!
//! ```ignore
//! use tilegrab::iiif::{AsyncReqwestClient, fetch_image_info};
//! use std::time::Duration;
//!
//! let client = AsyncReqwestClient::new()?;
//! let info = fetch_image_info(&client, "https://iiif.example.org/img/p1", Duration::from_secs(30)).await?;
//! ```

mod http;
mod info;
mod types;
pub mod url;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use info::{fetch_image_info, ImageInfo, MAX_IMAGE_PIXELS};
pub use types::FetchError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
