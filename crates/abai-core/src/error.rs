//! Error types for LUT import, history bookkeeping, document edits, and config.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors raised while turning an external LUT source into a [`LutTable`](crate::LutTable).
///
/// Any of these means "invalid LUT": the import is discarded and prior state is untouched.
#[derive(Debug, Error)]
pub enum LutError {
    /// Malformed line or keyword in a `.cube` file.
    #[error("parse error: {0}")]
    Parse(String),

    /// No `LUT_3D_SIZE` line was found.
    #[error("missing LUT_3D_SIZE")]
    MissingSize,

    /// Cube size is zero or too large to address.
    #[error("invalid LUT size: {0}")]
    InvalidSize(usize),

    /// Triple count does not equal size³.
    #[error("expected {expected} entries, found {found}")]
    SizeMismatch {
        /// size³
        expected: usize,
        /// Triples actually present.
        found: usize,
    },

    /// HALD grid image is not the expected square.
    #[error("HALD grid must be {expected}x{expected}, got {found_width}x{found_height}")]
    HaldDimensions {
        /// Required side length.
        expected: u32,
        /// Width of the supplied image.
        found_width: u32,
        /// Height of the supplied image.
        found_height: u32,
    },

    /// I/O error while reading a LUT source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HALD grid image could not be decoded.
    #[error("failed to decode LUT image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors from the snapshot history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// An image snapshot was pushed without a raster.
    #[error("image snapshot requires a raster")]
    MissingRaster,

    /// A parameter snapshot was pushed before any image snapshot.
    #[error("history must begin with an image snapshot")]
    NoBaseImage,

    /// Restore was asked for an index past the end.
    #[error("history index {0} out of range")]
    OutOfRange(usize),
}

/// Errors from document-level edits, loading, and export.
#[derive(Debug, Error)]
pub enum EditError {
    /// Crop rectangle is smaller than the minimum after clamping to bounds.
    #[error("crop area too small: {width}x{height} (minimum {min}px)")]
    CropTooSmall {
        /// Clamped width.
        width: i64,
        /// Clamped height.
        height: i64,
        /// Minimum side length.
        min: u32,
    },

    /// Two rasters that must share dimensions do not.
    #[error("raster size mismatch: {expected:?} vs {found:?}")]
    DimensionMismatch {
        /// Dimensions of the reference raster.
        expected: (u32, u32),
        /// Dimensions of the offending raster.
        found: (u32, u32),
    },

    /// Pixel buffer length does not match width × height.
    #[error("pixel buffer holds {found} pixels, expected {expected}")]
    BufferLength {
        /// width × height
        expected: usize,
        /// Actual pixel count.
        found: usize,
    },

    /// Raster has a zero dimension.
    #[error("raster dimensions must be positive, got {0}x{1}")]
    EmptyRaster(u32, u32),

    /// Image could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// Image could not be encoded.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// History rejected the snapshot.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors from loading an [`EditorConfig`](crate::EditorConfig) file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the config schema.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
