//! 3D LUT table, nearest-cell sampling, and blending.
//!
//! Entries are stored blue-major with red fastest, matching both the `.cube`
//! file order and the HALD grid layout:
//!
//! ```text
//! index = b × N² + g × N + r
//! ```
//!
//! Sampling rounds each channel to the nearest cell. It does not interpolate
//! between cells; banding on smooth gradients is expected and output must stay
//! byte-compatible with that rule.

use crate::error::{LutError, LutResult};
use crate::image::quantize;

/// Largest cube side accepted from external sources.
pub const MAX_LUT_SIZE: usize = 256;

/// Immutable 3D lookup table with channel values in `0.0..=255.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LutTable {
    size: usize,
    data: Vec<[f32; 3]>,
}

impl LutTable {
    /// Build a table from `size³` RGB triples in `b × N² + g × N + r` order.
    pub fn from_data(size: usize, data: Vec<[f32; 3]>) -> LutResult<Self> {
        if size < 2 || size > MAX_LUT_SIZE {
            return Err(LutError::InvalidSize(size));
        }
        let expected = size * size * size;
        if data.len() != expected {
            return Err(LutError::SizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// Identity cube of the given size.
    pub fn identity(size: usize) -> LutResult<Self> {
        if size < 2 || size > MAX_LUT_SIZE {
            return Err(LutError::InvalidSize(size));
        }
        let step = 255.0 / (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Ok(Self { size, data })
    }

    /// Cube side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of entries (N³).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn entries(&self) -> &[[f32; 3]] {
        &self.data
    }

    /// Flat index of a cell.
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        b * self.size * self.size + g * self.size + r
    }

    /// Cell coordinate for an 8-bit channel value: `round(v / 255 × (N − 1))`.
    #[inline]
    pub fn cell(&self, value: u8) -> usize {
        let n_1 = (self.size - 1) as f32;
        ((value as f32 / 255.0 * n_1).round() as usize).min(self.size - 1)
    }

    /// Nearest-cell lookup.
    pub fn sample(&self, rgb: [u8; 3]) -> [f32; 3] {
        let idx = self.index(self.cell(rgb[0]), self.cell(rgb[1]), self.cell(rgb[2]));
        self.data[idx]
    }

    /// Blend between `rgb` and its LUT value by `amount` in `0.0..=1.0`.
    ///
    /// ```text
    /// out = in + (lut − in) × amount
    /// ```
    pub fn blend(&self, rgb: [u8; 3], amount: f32) -> [u8; 3] {
        let lut = self.sample(rgb);
        std::array::from_fn(|c| {
            let v = rgb[c] as f32;
            quantize(v + (lut[c] - v) * amount)
        })
    }
}
