//! Central parameter record for the editing pipeline.
//!
//! `EditParameters` is the single source of truth for all slider adjustments.
//! Every slider writes here; the pixel pipeline reads the full struct, combined
//! with the active filter's baseline offsets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterId {
    /// No LUT, no baseline. Always available.
    #[default]
    Identity,
    /// Entry of the built-in catalog, by catalog index.
    BuiltIn(usize),
    /// A user-imported `.cube` LUT.
    User(u64),
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::BuiltIn(i) => write!(f, "builtin_{i}"),
            Self::User(id) => write!(f, "user_{id}"),
        }
    }
}

/// Slider values. Nominal range is `[-100, 100]` unless noted; values outside are
/// accepted and only the pixel output is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParameters {
    /// Exposure in 1/100 stops. 0.0 = neutral.
    pub exposure: f32,
    /// Contrast. 0.0 = neutral.
    pub contrast: f32,
    /// Highlight push/pull above mid-gray. 0.0 = neutral.
    pub highlights: f32,
    /// Shadow push/pull below mid-gray. 0.0 = neutral.
    pub shadows: f32,
    /// Temperature (warm/cool). 0.0 = neutral.
    pub temp: f32,
    /// Tint, applied to green only. 0.0 = neutral.
    pub tint: f32,
    /// Saturation. 0.0 = neutral.
    pub sat: f32,
    /// Vibrance. 0.0 = neutral.
    pub vib: f32,
    /// Soft glow amount, `[0, 100]`. Default 50.
    pub soft: f32,
    /// Film grain amount, `[0, 100]`. 0.0 = off.
    pub grain: f32,
    /// LUT blend strength, `[0, 100]`. Default 100.
    #[serde(rename = "lutAmount", alias = "lut_amount")]
    pub lut_amount: f32,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            contrast: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            temp: 0.0,
            tint: 0.0,
            sat: 0.0,
            vib: 0.0,
            soft: 50.0,
            grain: 0.0,
            lut_amount: 100.0,
        }
    }
}

impl EditParameters {
    /// Parameters that leave every pixel untouched: defaults with the glow switched off.
    pub fn neutral() -> Self {
        Self {
            soft: 0.0,
            ..Self::default()
        }
    }

    pub fn get(&self, slider: Slider) -> f32 {
        match slider {
            Slider::Exposure => self.exposure,
            Slider::Contrast => self.contrast,
            Slider::Highlights => self.highlights,
            Slider::Shadows => self.shadows,
            Slider::Temp => self.temp,
            Slider::Tint => self.tint,
            Slider::Sat => self.sat,
            Slider::Vib => self.vib,
            Slider::Soft => self.soft,
            Slider::Grain => self.grain,
            Slider::LutAmount => self.lut_amount,
        }
    }

    pub fn set(&mut self, slider: Slider, value: f32) {
        let field = match slider {
            Slider::Exposure => &mut self.exposure,
            Slider::Contrast => &mut self.contrast,
            Slider::Highlights => &mut self.highlights,
            Slider::Shadows => &mut self.shadows,
            Slider::Temp => &mut self.temp,
            Slider::Tint => &mut self.tint,
            Slider::Sat => &mut self.sat,
            Slider::Vib => &mut self.vib,
            Slider::Soft => &mut self.soft,
            Slider::Grain => &mut self.grain,
            Slider::LutAmount => &mut self.lut_amount,
        };
        *field = value;
    }

    /// Combine with a filter's baseline offsets.
    pub fn with_baseline(&self, baseline: &FilterBaseline) -> EffectiveParameters {
        EffectiveParameters {
            exposure: self.exposure + baseline.exp,
            contrast: self.contrast + baseline.con,
            highlights: self.highlights,
            shadows: self.shadows,
            temp: self.temp + baseline.temp,
            tint: self.tint + baseline.tint,
            sat: self.sat + baseline.sat,
            vib: self.vib + baseline.vib,
            soft: self.soft,
            grain: self.grain,
            lut_amount: self.lut_amount,
        }
    }
}

/// Additive bias a filter applies to the user's parameters before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterBaseline {
    pub exp: f32,
    pub con: f32,
    pub sat: f32,
    pub vib: f32,
    pub temp: f32,
    pub tint: f32,
}

/// User parameters with the active filter's baseline already folded in.
///
/// Highlights and shadows carry no baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParameters {
    pub exposure: f32,
    pub contrast: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub temp: f32,
    pub tint: f32,
    pub sat: f32,
    pub vib: f32,
    pub soft: f32,
    pub grain: f32,
    pub lut_amount: f32,
}

impl From<EditParameters> for EffectiveParameters {
    fn from(params: EditParameters) -> Self {
        params.with_baseline(&FilterBaseline::default())
    }
}

/// The eleven user-facing sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Exposure,
    Contrast,
    Highlights,
    Shadows,
    Temp,
    Tint,
    Sat,
    Vib,
    Soft,
    Grain,
    LutAmount,
}

impl Slider {
    pub const ALL: [Slider; 11] = [
        Slider::Exposure,
        Slider::Contrast,
        Slider::Highlights,
        Slider::Shadows,
        Slider::Temp,
        Slider::Tint,
        Slider::Sat,
        Slider::Vib,
        Slider::Soft,
        Slider::Grain,
        Slider::LutAmount,
    ];

    /// Stable identifier used in parameter files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exposure => "exposure",
            Self::Contrast => "contrast",
            Self::Highlights => "highlights",
            Self::Shadows => "shadows",
            Self::Temp => "temp",
            Self::Tint => "tint",
            Self::Sat => "sat",
            Self::Vib => "vib",
            Self::Soft => "soft",
            Self::Grain => "grain",
            Self::LutAmount => "lutAmount",
        }
    }

    /// Value restored by a slider reset.
    pub const fn default_value(self) -> f32 {
        match self {
            Self::Soft => 50.0,
            Self::LutAmount => 100.0,
            _ => 0.0,
        }
    }

    /// Nominal UI range `(min, max)`.
    pub const fn range(self) -> (f32, f32) {
        match self {
            Self::Soft | Self::Grain | Self::LutAmount => (0.0, 100.0),
            _ => (-100.0, 100.0),
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised slider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slider: {0}")]
pub struct UnknownSlider(pub String);

impl FromStr for Slider {
    type Err = UnknownSlider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slider::ALL
            .into_iter()
            .find(|slider| slider.name().eq_ignore_ascii_case(s))
            .or_else(|| (s == "lut_amount").then_some(Slider::LutAmount))
            .ok_or_else(|| UnknownSlider(s.to_string()))
    }
}
