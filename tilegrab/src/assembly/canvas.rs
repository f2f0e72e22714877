//! Full-resolution canvas assembly.

use super::encoder::{EncodeError, ImageEncoder};
use image::{imageops, RgbImage};
use thiserror::Error;

/// Errors raised while building a canvas.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("canvas size {width}x{height} is empty")]
    EmptyCanvas { width: u32, height: u32 },

    #[error(
        "tile {tile_width}x{tile_height} at ({x}, {y}) exceeds canvas {canvas_width}x{canvas_height}"
    )]
    OutOfBounds {
        x: u32,
        y: u32,
        tile_width: u32,
        tile_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("canvas incomplete: {covered} of {total} pixels pasted")]
    Incomplete { covered: u64, total: u64 },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// In-memory RGB canvas onto which tiles are pasted at their offsets.
///
/// Tiles may arrive in any order. The canvas is only handed out once every
/// pixel has been covered, so a partially filled canvas cannot reach the
/// encoder.
///
/// # Example
///
/// ```
/// use tilegrab::assembly::{ImageAssembler, JpegEncoder};
/// use image::{Rgb, RgbImage};
///
/// let mut assembler = ImageAssembler::new(4, 2).unwrap();
/// assembler.paste(&RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])), 0, 0).unwrap();
/// assembler.paste(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 255])), 2, 0).unwrap();
///
/// let jpeg = assembler.finalize(&JpegEncoder::new()).unwrap();
/// assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
/// ```
#[derive(Debug)]
pub struct ImageAssembler {
    canvas: RgbImage,
    covered: u64,
    tiles: usize,
}

impl ImageAssembler {
    pub fn new(width: u32, height: u32) -> Result<Self, AssemblyError> {
        if width == 0 || height == 0 {
            return Err(AssemblyError::EmptyCanvas { width, height });
        }

        Ok(Self {
            canvas: RgbImage::new(width, height),
            covered: 0,
            tiles: 0,
        })
    }

    /// Copies `tile` onto the canvas with its top-left corner at `(x, y)`.
    pub fn paste(&mut self, tile: &RgbImage, x: u32, y: u32) -> Result<(), AssemblyError> {
        let fits_x = x
            .checked_add(tile.width())
            .is_some_and(|right| right <= self.canvas.width());
        let fits_y = y
            .checked_add(tile.height())
            .is_some_and(|bottom| bottom <= self.canvas.height());

        if !fits_x || !fits_y {
            return Err(AssemblyError::OutOfBounds {
                x,
                y,
                tile_width: tile.width(),
                tile_height: tile.height(),
                canvas_width: self.canvas.width(),
                canvas_height: self.canvas.height(),
            });
        }

        imageops::replace(&mut self.canvas, tile, i64::from(x), i64::from(y));
        self.covered += u64::from(tile.width()) * u64::from(tile.height());
        self.tiles += 1;
        Ok(())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Number of tiles pasted so far.
    pub fn tiles_pasted(&self) -> usize {
        self.tiles
    }

    fn total_pixels(&self) -> u64 {
        u64::from(self.canvas.width()) * u64::from(self.canvas.height())
    }

    /// Encodes the finished canvas, consuming the assembler.
    pub fn finalize(self, encoder: &dyn ImageEncoder) -> Result<Vec<u8>, AssemblyError> {
        let image = self.into_image()?;
        Ok(encoder.encode(&image)?)
    }

    /// Returns the finished bitmap once every pixel is covered.
    ///
    /// Pasted tiles are assumed not to overlap, which holds for grids
    /// produced by [`TileGridPlanner`](crate::tile::TileGridPlanner).
    pub fn into_image(self) -> Result<RgbImage, AssemblyError> {
        let total = self.total_pixels();
        if self.covered != total {
            return Err(AssemblyError::Incomplete {
                covered: self.covered,
                total,
            });
        }
        Ok(self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::JpegEncoder;
    use crate::tile::{TileGridPlanner, TileSpec};
    use image::imageops;
    use image::Rgb;
    use proptest::prelude::*;

    fn solid(width: u32, height: u32, colour: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(colour))
    }

    /// Every pixel distinct within a 256-wide band.
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * 7 + y * 13) % 256) as u8])
        })
    }

    /// Crops each planned tile out of `reference` and pastes them in `order`.
    fn reassemble(reference: &RgbImage, plan: &[TileSpec], order: &[usize]) -> RgbImage {
        let (width, height) = reference.dimensions();
        let mut assembler = ImageAssembler::new(width, height).unwrap();
        for &i in order {
            let spec = &plan[i];
            let tile = imageops::crop_imm(reference, spec.x, spec.y, spec.width, spec.height)
                .to_image();
            assembler.paste(&tile, spec.x, spec.y).unwrap();
        }
        assembler.into_image().unwrap()
    }

    #[test]
    fn test_reassembled_grid_matches_reference() {
        let reference = gradient(300, 170);
        let plan = TileGridPlanner::new("http://iiif.test/ref").plan(300, 170, 64);
        assert_eq!(plan.len(), 15);

        // Interleaved order: odd indices backwards, then even ones
        let mut order: Vec<usize> = (0..plan.len()).filter(|i| i % 2 == 1).rev().collect();
        order.extend((0..plan.len()).filter(|i| i % 2 == 0));

        assert_eq!(reassemble(&reference, &plan, &order), reference);
    }

    proptest! {
        #[test]
        fn prop_any_paste_order_reproduces_reference(
            (width, height, tile_size, order) in (1u32..80, 1u32..80, 1u32..32)
                .prop_flat_map(|(w, h, t)| {
                    let tiles = (w.div_ceil(t) * h.div_ceil(t)) as usize;
                    (
                        Just(w),
                        Just(h),
                        Just(t),
                        Just((0..tiles).collect::<Vec<_>>()).prop_shuffle(),
                    )
                })
        ) {
            let reference = gradient(width, height);
            let plan = TileGridPlanner::new("http://iiif.test/ref").plan(width, height, tile_size);
            prop_assert_eq!(plan.len(), order.len());
            prop_assert_eq!(reassemble(&reference, &plan, &order), reference);
        }
    }

    #[test]
    fn test_empty_canvas_rejected() {
        assert!(matches!(
            ImageAssembler::new(0, 10),
            Err(AssemblyError::EmptyCanvas { .. })
        ));
    }

    #[test]
    fn test_tiles_land_at_offsets_in_any_order() {
        let mut assembler = ImageAssembler::new(5, 3).unwrap();

        // Bottom-right first, clipped edge tiles included
        assembler.paste(&solid(2, 1, [4, 4, 4]), 3, 2).unwrap();
        assembler.paste(&solid(3, 2, [1, 1, 1]), 0, 0).unwrap();
        assembler.paste(&solid(3, 1, [3, 3, 3]), 0, 2).unwrap();
        assembler.paste(&solid(2, 2, [2, 2, 2]), 3, 0).unwrap();

        assert_eq!(assembler.tiles_pasted(), 4);
        let image = assembler.into_image().unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgb([1, 1, 1]));
        assert_eq!(image.get_pixel(2, 1), &Rgb([1, 1, 1]));
        assert_eq!(image.get_pixel(3, 0), &Rgb([2, 2, 2]));
        assert_eq!(image.get_pixel(4, 1), &Rgb([2, 2, 2]));
        assert_eq!(image.get_pixel(0, 2), &Rgb([3, 3, 3]));
        assert_eq!(image.get_pixel(4, 2), &Rgb([4, 4, 4]));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut assembler = ImageAssembler::new(4, 4).unwrap();

        let err = assembler.paste(&solid(3, 3, [0, 0, 0]), 2, 0).unwrap_err();
        assert!(matches!(err, AssemblyError::OutOfBounds { x: 2, y: 0, .. }));

        let err = assembler
            .paste(&solid(1, 1, [0, 0, 0]), u32::MAX, 0)
            .unwrap_err();
        assert!(matches!(err, AssemblyError::OutOfBounds { .. }));
        assert_eq!(assembler.tiles_pasted(), 0);
    }

    #[test]
    fn test_incomplete_canvas_not_finalized() {
        let mut assembler = ImageAssembler::new(4, 4).unwrap();
        assembler.paste(&solid(2, 4, [9, 9, 9]), 0, 0).unwrap();

        assert!(matches!(
            assembler.finalize(&JpegEncoder::new()),
            Err(AssemblyError::Incomplete {
                covered: 8,
                total: 16
            })
        ));
    }

    #[test]
    fn test_finalize_encodes_complete_canvas() {
        let mut assembler = ImageAssembler::new(16, 8).unwrap();
        assembler.paste(&solid(16, 8, [10, 200, 30]), 0, 0).unwrap();

        let bytes = assembler.finalize(&JpegEncoder::new()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
