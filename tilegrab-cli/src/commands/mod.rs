//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`download`] - Download every image of an archive
//! - [`probe`] - Inspect one image service
//! - [`init`] - Configuration initialization

pub mod common;
pub mod download;
pub mod init;
pub mod probe;
