//! White balance adjustment via per-channel offsets.
//!
//! Temperature moves along a warm/cool axis touching all three channels; tint
//! only ever moves green. The asymmetry is part of the look and is kept as is.

/// Temperature slider to offset scale.
const TEMP_SCALE: f32 = 0.15;
/// Tint slider to offset scale.
const TINT_SCALE: f32 = 0.08;

/// Additive RGB offsets derived from temperature and tint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WhiteBalance {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl WhiteBalance {
    /// Derive offsets from slider values.
    ///
    /// ```text
    /// t = temp × 0.15
    /// t > 0:  R += 1.2t, G += 0.4t, B −= 0.8t
    /// t ≤ 0:  B += 1.2|t|, R −= 0.5|t|
    /// G += tint × 0.08 × 2
    /// ```
    ///
    /// Both values at 0.0 produce zero offsets.
    pub fn new(temp: f32, tint: f32) -> Self {
        let input_temp = temp * TEMP_SCALE;
        let input_tint = tint * TINT_SCALE;

        let mut wb = if input_temp > 0.0 {
            Self {
                r: input_temp * 1.2,
                g: input_temp * 0.4,
                b: -input_temp * 0.8,
            }
        } else {
            let cool = input_temp.abs();
            Self {
                r: -cool * 0.5,
                g: 0.0,
                b: cool * 1.2,
            }
        };
        wb.g += input_tint * 2.0;
        wb
    }

    pub fn is_neutral(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Add the offsets to an RGB triple.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        [rgb[0] + self.r, rgb[1] + self.g, rgb[2] + self.b]
    }
}
