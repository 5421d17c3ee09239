//! Per-pixel evaluation of the adjustment chain.

use crate::grading::sliders::{
    apply_contrast, apply_exposure, apply_saturation, apply_shadows_highlights, apply_vibrance,
    channel_average, contrast_factor, exposure_gain, saturation_multiplier,
};
use crate::grading::white_balance::WhiteBalance;
use crate::image::quantize;
use crate::transform::params::EffectiveParameters;

/// Per-render constants derived once from the effective parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelStages {
    pub gain: f32,
    pub contrast: f32,
    pub shadows: f32,
    pub highlights: f32,
    pub white_balance: WhiteBalance,
    pub saturation: f32,
    /// Vibrance slider divided by 100.
    pub vibrance: f32,
}

impl PixelStages {
    pub fn new(params: &EffectiveParameters) -> Self {
        Self {
            gain: exposure_gain(params.exposure),
            contrast: contrast_factor(params.contrast),
            shadows: params.shadows,
            highlights: params.highlights,
            white_balance: WhiteBalance::new(params.temp, params.tint),
            saturation: saturation_multiplier(params.sat),
            vibrance: params.vib / 100.0,
        }
    }

    /// True when every stage leaves 8-bit input untouched.
    pub fn is_neutral(&self) -> bool {
        self.gain == 1.0
            && self.contrast == 1.0
            && self.shadows == 0.0
            && self.highlights == 0.0
            && self.white_balance.is_neutral()
            && self.saturation == 1.0
            && self.vibrance == 0.0
    }
}

/// Applies the adjustment chain to one pixel:
/// 1. Exposure gain
/// 2. Contrast around mid-gray
/// 3. Shadows/highlights, then clamp
/// 4. White balance offsets
/// 5. Saturation
/// 6. Vibrance
/// 7. Quantize to 8 bits
///
/// Alpha passes through unchanged.
pub fn evaluate_transform(px: [u8; 4], stages: &PixelStages) -> [u8; 4] {
    let mut rgb = [px[0] as f32, px[1] as f32, px[2] as f32];

    rgb = apply_exposure(rgb, stages.gain);
    rgb = apply_contrast(rgb, stages.contrast);
    rgb = apply_shadows_highlights(rgb, stages.shadows, stages.highlights);
    rgb = stages.white_balance.apply(rgb);

    // Saturation preserves the average, so vibrance can reuse it.
    let avg = channel_average(rgb);
    rgb = apply_saturation(rgb, avg, stages.saturation);
    rgb = apply_vibrance(rgb, avg, stages.vibrance);

    [quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2]), px[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::params::EditParameters;

    fn stages(params: EditParameters) -> PixelStages {
        PixelStages::new(&params.into())
    }

    #[test]
    fn test_neutral_stages_are_identity() {
        let s = stages(EditParameters::default());
        assert!(s.is_neutral());
        for px in [[0, 0, 0, 0], [12, 200, 99, 128], [255, 255, 255, 255], [128, 1, 254, 3]] {
            assert_eq!(evaluate_transform(px, &s), px);
        }
    }

    #[test]
    fn test_exposure_doubles_and_clamps() {
        let s = stages(EditParameters {
            exposure: 100.0,
            ..Default::default()
        });
        assert_eq!(evaluate_transform([50, 100, 200, 255], &s), [100, 200, 255, 255]);
    }

    #[test]
    fn test_warm_temperature_on_gray() {
        let s = stages(EditParameters {
            temp: 100.0,
            ..Default::default()
        });
        // R +18, G +6, B -12
        assert_eq!(evaluate_transform([100, 100, 100, 255], &s), [118, 106, 88, 255]);
    }

    #[test]
    fn test_full_desaturation_averages_channels() {
        let s = stages(EditParameters {
            sat: -100.0,
            ..Default::default()
        });
        assert_eq!(evaluate_transform([90, 60, 30, 200], &s), [60, 60, 60, 200]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let s = stages(EditParameters {
            exposure: 40.0,
            contrast: 30.0,
            shadows: 20.0,
            vib: 50.0,
            ..Default::default()
        });
        assert_eq!(evaluate_transform([10, 20, 30, 42], &s)[3], 42);
    }

    #[test]
    fn test_black_with_vibrance_stays_finite() {
        let s = stages(EditParameters {
            vib: 100.0,
            ..Default::default()
        });
        assert_eq!(evaluate_transform([0, 0, 0, 255], &s), [0, 0, 0, 255]);
    }
}
