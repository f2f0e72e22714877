//! Tile region and fetch result types.

use crate::iiif::FetchError;
use image::RgbImage;

/// One rectangular region of a full-resolution image and the URL serving it.
///
/// Specs are derived deterministically from the image size and the probed
/// tile size, and regenerated on every planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileSpec {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub url: String,
}

impl TileSpec {
    /// Top-left corner, used as the tile's identity within one grid.
    pub fn origin(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Outcome of fetching one tile.
#[derive(Debug)]
pub enum TileOutcome {
    /// Decoded bitmap with the exact dimensions of the spec
    Success(RgbImage),
    /// Why the tile could not be obtained
    Failure(FetchError),
}

/// A tile spec paired with the outcome of fetching it.
///
/// Fetching never unwinds: every failure mode is carried in
/// [`TileOutcome::Failure`].
#[derive(Debug)]
pub struct TileResult {
    pub spec: TileSpec,
    pub outcome: TileOutcome,
}

impl TileResult {
    pub fn success(spec: TileSpec, bitmap: RgbImage) -> Self {
        Self {
            spec,
            outcome: TileOutcome::Success(bitmap),
        }
    }

    pub fn failure(spec: TileSpec, error: FetchError) -> Self {
        Self {
            spec,
            outcome: TileOutcome::Failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TileOutcome::Success(_))
    }
}
