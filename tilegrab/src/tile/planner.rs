//! Tile grid planning.

use super::spec::TileSpec;
use crate::iiif::url::region_url;

/// Plans the tile grid for images served by one image service.
///
/// The grid covers `[0, width) × [0, height)` exactly: tiles never overlap,
/// never leave gaps, and the last column/row is clipped to the image edge
/// instead of reading past it. Specs are emitted row-major (y outer, x
/// inner) so sequential fetch order is stable across runs.
///
/// # Example
///
/// ```
/// use tilegrab::tile::TileGridPlanner;
///
/// let planner = TileGridPlanner::new("https://iiif.example.org/img/p1");
/// let grid = planner.plan(2000, 1500, 1024);
///
/// let rects: Vec<_> = grid.iter().map(|t| (t.x, t.y, t.width, t.height)).collect();
/// assert_eq!(
///     rects,
///     vec![(0, 0, 1024, 1024), (1024, 0, 976, 1024), (0, 1024, 1024, 476), (1024, 1024, 976, 476)]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TileGridPlanner<'a> {
    service_base_url: &'a str,
}

impl<'a> TileGridPlanner<'a> {
    pub fn new(service_base_url: &'a str) -> Self {
        Self { service_base_url }
    }

    /// Computes the grid for a `full_width × full_height` image.
    ///
    /// A `tile_size` of 0 is treated as 1. A zero-area image yields an empty
    /// plan.
    pub fn plan(&self, full_width: u32, full_height: u32, tile_size: u32) -> Vec<TileSpec> {
        let tile_size = tile_size.max(1);
        let mut specs = Vec::new();

        for y in (0..full_height).step_by(tile_size as usize) {
            let height = tile_size.min(full_height - y);
            for x in (0..full_width).step_by(tile_size as usize) {
                let width = tile_size.min(full_width - x);
                specs.push(TileSpec {
                    x,
                    y,
                    width,
                    height,
                    url: region_url(self.service_base_url, x, y, width, height),
                });
            }
        }

        specs
    }
}
