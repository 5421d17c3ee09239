//! Raster representation for the editing pipeline.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Default cap on the longer side of a loaded raster.
pub const MAX_DIMENSION: u32 = 4096;

/// Default minimum side length of a crop.
pub const MIN_CROP_SIZE: u32 = 10;

/// 8-bit RGBA raster. Always stored unpremultiplied, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height` entries of `[R, G, B, A]`.
    pub pixels: Vec<[u8; 4]>,
}

impl Raster {
    /// Build a raster from an existing pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self, EditError> {
        if width == 0 || height == 0 {
            return Err(EditError::EmptyRaster(width, height));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EditError::BufferLength {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgba; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copy out the sub-rectangle described by an already-clamped crop.
    pub fn crop(&self, rect: &PixelRect) -> Raster {
        let mut pixels = Vec::with_capacity(rect.width as usize * rect.height as usize);
        let stride = self.width as usize;
        for y in rect.y..rect.y + rect.height {
            let row = y as usize * stride;
            let start = row + rect.x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + rect.width as usize]);
        }
        Raster {
            width: rect.width,
            height: rect.height,
            pixels,
        }
    }

    /// Convert from an `image` crate buffer.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an `image` crate buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let bytes: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        // Length always matches width * height * 4.
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

/// Dimensions after fitting `(width, height)` inside `max` on both sides.
///
/// Aspect ratio is preserved and the result is floored. Rasters already within
/// bounds are returned unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    // Integer math keeps the limiting side at exactly `max`.
    let (w, h, max) = (width as u64, height as u64, max as u64);
    if w >= h {
        (max as u32, ((h * max / w) as u32).max(1))
    } else {
        (((w * max / h) as u32).max(1), max as u32)
    }
}

/// Store a working value into an 8-bit channel.
///
/// Clamps to `[0, 255]`, maps NaN to 0, and rounds half to even.
#[inline]
pub fn quantize(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Crop rectangle as requested, in image pixel coordinates. May extend past the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Crop rectangle clamped to image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp to a `image_width × image_height` image and enforce `min_size` on both sides.
    pub fn clamp_to(
        &self,
        image_width: u32,
        image_height: u32,
        min_size: u32,
    ) -> Result<PixelRect, EditError> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let width = self.width.min(image_width as i64 - x);
        let height = self.height.min(image_height as i64 - y);

        if width < min_size as i64 || height < min_size as i64 {
            return Err(EditError::CropTooSmall {
                width,
                height,
                min: min_size,
            });
        }

        Ok(PixelRect {
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}
