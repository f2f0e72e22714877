//! Canvas assembly and output encoding.

mod canvas;
mod encoder;

pub use canvas::{AssemblyError, ImageAssembler};
pub use encoder::{EncodeError, ImageEncoder, JpegEncoder};
