//! HALD grid image → 3D LUT.
//!
//! A cube of side N is stored as a square image of side `N × √N`, tiled
//! `√N × √N`. Tile `b` holds the blue slice `b`; inside a tile, x is red and
//! y is green. For N = 64 that is a 512×512 image of 8×8 tiles.
//!
//! ```text
//! x = (b mod √N) × N + r
//! y = ⌊b / √N⌋ × N + g
//! ```

use std::path::Path;

use crate::error::{LutError, LutResult};
use crate::image::Raster;
use crate::transform::lut::{LutTable, MAX_LUT_SIZE};

/// Tiles per row for a cube size, if the size has an integral square root.
pub fn tiles_per_row(size: usize) -> Option<usize> {
    let root = (size as f64).sqrt().round() as usize;
    (root * root == size).then_some(root)
}

/// Required image side length for a cube size.
pub fn grid_side(size: usize) -> Option<u32> {
    tiles_per_row(size).map(|tiles| (tiles * size) as u32)
}

/// Parse a decoded HALD grid into a LUT of side `size`.
pub fn parse_hald(grid: &Raster, size: usize) -> LutResult<LutTable> {
    if size < 2 || size > MAX_LUT_SIZE {
        return Err(LutError::InvalidSize(size));
    }
    let tiles = tiles_per_row(size).ok_or(LutError::InvalidSize(size))?;
    let side = (tiles * size) as u32;
    if grid.width != side || grid.height != side {
        return Err(LutError::HaldDimensions {
            expected: side,
            found_width: grid.width,
            found_height: grid.height,
        });
    }

    let stride = grid.width as usize;
    let mut data = Vec::with_capacity(size * size * size);
    for b in 0..size {
        let tile_x = (b % tiles) * size;
        let tile_y = (b / tiles) * size;
        for g in 0..size {
            let row = (tile_y + g) * stride + tile_x;
            for r in 0..size {
                let px = grid.pixels[row + r];
                data.push([px[0] as f32, px[1] as f32, px[2] as f32]);
            }
        }
    }

    LutTable::from_data(size, data)
}

/// Decode a HALD grid image from disk and parse it.
pub fn read_hald<P: AsRef<Path>>(path: P, size: usize) -> LutResult<LutTable> {
    let img = image::open(path.as_ref())?.to_rgba8();
    parse_hald(&Raster::from_rgba_image(&img), size)
}
