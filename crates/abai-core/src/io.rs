//! Image decode on load and JPEG export.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use tracing::{debug, info};

use crate::error::EditError;
use crate::image::{Raster, fit_within};

/// Prefix of exported file names.
pub const EXPORT_PREFIX: &str = "ABAI_Pro_";

/// Decode an encoded image and downscale it to fit within `max_dimension`.
pub fn decode_image(bytes: &[u8], max_dimension: u32) -> Result<Raster, EditError> {
    let img = image::load_from_memory(bytes).map_err(EditError::Decode)?;
    from_dynamic(img, max_dimension)
}

/// Read and decode an image file, downscaling to fit within `max_dimension`.
pub fn load_image(path: &Path, max_dimension: u32) -> Result<Raster, EditError> {
    let bytes = fs::read(path)?;
    let raster = decode_image(&bytes, max_dimension)?;
    info!(
        path = %path.display(),
        width = raster.width,
        height = raster.height,
        "image loaded"
    );
    Ok(raster)
}

fn from_dynamic(img: DynamicImage, max_dimension: u32) -> Result<Raster, EditError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(EditError::EmptyRaster(width, height));
    }

    let (fit_w, fit_h) = fit_within(width, height, max_dimension);
    if (fit_w, fit_h) == (width, height) {
        return Ok(Raster::from_rgba_image(&rgba));
    }

    debug!(width, height, fit_w, fit_h, "downscaling on load");
    let resized = imageops::resize(&rgba, fit_w, fit_h, FilterType::Triangle);
    Ok(Raster::from_rgba_image(&resized))
}

/// `ABAI_Pro_<timestamp_ms>.jpg`
pub fn export_filename(timestamp_ms: u128) -> String {
    format!("{EXPORT_PREFIX}{timestamp_ms}.jpg")
}

/// Encode as baseline JPEG at `quality` (1-100). Alpha is discarded.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, EditError> {
    let rgb = DynamicImage::ImageRgba8(raster.to_rgba_image()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(EditError::Encode)?;
    Ok(bytes)
}

/// Write `raster` as a timestamped JPEG into `dir` and return the file path.
pub fn export(raster: &Raster, dir: &Path, quality: u8) -> Result<PathBuf, EditError> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let path = dir.join(export_filename(timestamp_ms));
    export_to(raster, &path, quality)?;
    Ok(path)
}

/// Write `raster` as JPEG to an explicit path.
pub fn export_to(raster: &Raster, path: &Path, quality: u8) -> Result<(), EditError> {
    let bytes = encode_jpeg(raster, quality)?;
    fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), quality, "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = Raster::filled(width, height, [200, 100, 50, 255]).to_rgba_image();
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_export_filename_pattern() {
        assert_eq!(export_filename(1700000000123), "ABAI_Pro_1700000000123.jpg");
    }

    #[test]
    fn test_decode_keeps_small_images() {
        let raster = decode_image(&png_bytes(30, 20), 4096).unwrap();
        assert_eq!(raster.dimensions(), (30, 20));
        assert_eq!(raster.get(0, 0), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_decode_downscales_long_side() {
        let raster = decode_image(&png_bytes(100, 40), 50).unwrap();
        assert_eq!(raster.dimensions(), (50, 20));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(matches!(
            decode_image(b"not an image", 4096),
            Err(EditError::Decode(_))
        ));
    }

    #[test]
    fn test_export_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let raster = Raster::filled(16, 8, [40, 80, 120, 255]);
        let path = export(&raster, dir.path(), 95).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(EXPORT_PREFIX));
        assert!(name.ends_with(".jpg"));

        let back = load_image(&path, 4096).unwrap();
        assert_eq!(back.dimensions(), (16, 8));
    }
}
