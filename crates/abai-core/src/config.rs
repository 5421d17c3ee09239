//! Editor configuration.
//!
//! Loaded from an optional JSON file; missing fields take their defaults.
//! `ABAI_LUT_DIR` and `ABAI_MAX_DIMENSION` override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::filters::BUILTIN_LUT_SIZE;
use crate::image::{MAX_DIMENSION, MIN_CROP_SIZE};

/// Default JPEG export quality.
const DEFAULT_EXPORT_QUALITY: u8 = 95;
/// Default directory holding the built-in HALD grids.
const DEFAULT_LUT_DIR: &str = "luts";
/// Default before/after split position.
const DEFAULT_SPLIT: f32 = 0.5;

const ENV_LUT_DIR: &str = "ABAI_LUT_DIR";
const ENV_MAX_DIMENSION: &str = "ABAI_MAX_DIMENSION";

/// Runtime configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Longer-side cap applied when an image is loaded.
    pub max_dimension: u32,
    /// Minimum crop side length in pixels.
    pub min_crop_size: u32,
    /// JPEG quality used on export (1-100).
    pub export_quality: u8,
    /// Directory containing `<name>_grid.png` files.
    pub builtin_lut_dir: PathBuf,
    /// Cube size of the built-in grids.
    pub builtin_lut_size: usize,
    /// Initial split position (0.0-1.0 of width).
    pub split_position: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            min_crop_size: MIN_CROP_SIZE,
            export_quality: DEFAULT_EXPORT_QUALITY,
            builtin_lut_dir: PathBuf::from(DEFAULT_LUT_DIR),
            builtin_lut_size: BUILTIN_LUT_SIZE,
            split_position: DEFAULT_SPLIT,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `ABAI_LUT_DIR` / `ABAI_MAX_DIMENSION` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_LUT_DIR).ok(),
            std::env::var(ENV_MAX_DIMENSION).ok(),
        )
    }

    fn with_overrides(mut self, lut_dir: Option<String>, max_dimension: Option<String>) -> Self {
        if let Some(dir) = lut_dir {
            self.builtin_lut_dir = PathBuf::from(dir);
        }
        if let Some(raw) = max_dimension {
            match raw.parse::<u32>() {
                Ok(v) if v > 0 => self.max_dimension = v,
                _ => warn!(value = %raw, "ignoring invalid {ENV_MAX_DIMENSION}"),
            }
        }
        self
    }
}
