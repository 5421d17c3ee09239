//! Slider-based tone and color adjustments (exposure, contrast, shadows/highlights,
//! saturation, vibrance).
//!
//! All functions work on 8-bit-scaled values (`0.0..=255.0` nominal) and do not clamp
//! unless stated. The pipeline calls them in a fixed order.

/// Rec. 601 luminance weights.
pub const LUMA_REC601: [f32; 3] = [0.299, 0.587, 0.114];

/// Tonal midpoint for contrast and the shadows/highlights split.
const MID_GRAY: f32 = 128.0;

/// Maximum shadows/highlights push at ±100, in 8-bit units.
const TONE_PUSH: f32 = 255.0 * 0.5;

/// Rec. 601 luma of an RGB triple.
#[inline]
pub fn luma(rgb: [f32; 3]) -> f32 {
    LUMA_REC601[0] * rgb[0] + LUMA_REC601[1] * rgb[1] + LUMA_REC601[2] * rgb[2]
}

/// Multiplicative gain for an exposure value.
///
/// ```text
/// gain = 2 ^ (exposure / 100)
/// ```
pub fn exposure_gain(exposure: f32) -> f32 {
    (exposure / 100.0).exp2()
}

/// Multiply every channel by `gain`.
#[inline]
pub fn apply_exposure(rgb: [f32; 3], gain: f32) -> [f32; 3] {
    [rgb[0] * gain, rgb[1] * gain, rgb[2] * gain]
}

/// Classic contrast-correction factor.
///
/// ```text
/// factor = 259 × (c + 255) / (255 × (259 − c))
/// ```
///
/// `c = 0` yields exactly 1. `c = 259` divides by zero and yields infinity, which
/// the final quantization maps to the channel limits.
pub fn contrast_factor(contrast: f32) -> f32 {
    (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast))
}

/// Remap each channel around mid-gray.
///
/// ```text
/// out = factor × (in − 128) + 128
/// ```
#[inline]
pub fn apply_contrast(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    [
        factor * (rgb[0] - MID_GRAY) + MID_GRAY,
        factor * (rgb[1] - MID_GRAY) + MID_GRAY,
        factor * (rgb[2] - MID_GRAY) + MID_GRAY,
    ]
}

/// Push shadows and highlights by luma-weighted offsets, then clamp to `[0, 255]`.
///
/// Weights come from the luma of the input (already exposure/contrast adjusted):
///
/// ```text
/// shadow_push    = −shadows / 100 × 127.5 × max(0, (128 − L) / 128)
/// highlight_push =  highlights / 100 × 127.5 × max(0, (L − 128) / 128)
/// ```
///
/// The same offset is added to all three channels. A zero parameter skips its push
/// entirely, but the clamp always runs.
pub fn apply_shadows_highlights(rgb: [f32; 3], shadows: f32, highlights: f32) -> [f32; 3] {
    let l = luma(rgb);
    let mut push = 0.0;

    if shadows != 0.0 {
        let shadow_val = -shadows / 100.0 * TONE_PUSH;
        push += shadow_val * ((MID_GRAY - l) / MID_GRAY).max(0.0);
    }
    if highlights != 0.0 {
        let highlight_val = highlights / 100.0 * TONE_PUSH;
        push += highlight_val * ((l - MID_GRAY) / MID_GRAY).max(0.0);
    }

    [
        (rgb[0] + push).clamp(0.0, 255.0),
        (rgb[1] + push).clamp(0.0, 255.0),
        (rgb[2] + push).clamp(0.0, 255.0),
    ]
}

/// Mean of the three channels.
#[inline]
pub fn channel_average(rgb: [f32; 3]) -> f32 {
    (rgb[0] + rgb[1] + rgb[2]) / 3.0
}

/// Scale each channel's deviation from `avg` by `factor`.
#[inline]
fn scale_deviation(rgb: [f32; 3], avg: f32, factor: f32) -> [f32; 3] {
    [
        avg + (rgb[0] - avg) * factor,
        avg + (rgb[1] - avg) * factor,
        avg + (rgb[2] - avg) * factor,
    ]
}

/// Saturation multiplier for a slider value: `1 + sat / 100`.
pub fn saturation_multiplier(sat: f32) -> f32 {
    1.0 + sat / 100.0
}

/// Uniform saturation around the channel average.
pub fn apply_saturation(rgb: [f32; 3], avg: f32, multiplier: f32) -> [f32; 3] {
    if multiplier == 1.0 {
        return rgb;
    }
    scale_deviation(rgb, avg, multiplier)
}

/// Saturation of an RGB triple as `(max − min) / max`; 0 for pure black.
pub fn current_saturation(rgb: [f32; 3]) -> f32 {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    if max == 0.0 { 0.0 } else { (max - min) / max }
}

/// Vibrance around the channel average. `vibrance` is the slider value divided by 100.
///
/// Positive values boost muted colors more than saturated ones:
///
/// ```text
/// factor = 1 + vibrance × (1 − sat²)
/// ```
///
/// Negative values desaturate linearly: `factor = 1 + vibrance`.
pub fn apply_vibrance(rgb: [f32; 3], avg: f32, vibrance: f32) -> [f32; 3] {
    if vibrance == 0.0 {
        return rgb;
    }

    let factor = if vibrance > 0.0 {
        let sat = current_saturation(rgb);
        1.0 + vibrance * (1.0 - sat * sat)
    } else {
        1.0 + vibrance
    };
    scale_deviation(rgb, avg, factor)
}
