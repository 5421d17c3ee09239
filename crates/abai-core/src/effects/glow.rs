//! Soft glow: a blurred highlight mask screen-blended back over the image.
//!
//! ```text
//!   Raster ──→ luma ≥ 140 mask ──→ ½ res ──→ Gaussian σ=max(2, w/100) ──→ full res ──→ screen @ soft×1.2%
//! ```

use tracing::debug;

use super::blur::{Rgba, gaussian_blur, resample_bilinear};
use crate::grading::sliders::luma;
use crate::image::{Raster, quantize};

/// Luma at which pixels start contributing to the glow mask.
pub const GLOW_THRESHOLD: f32 = 140.0;

/// Mask alpha ramp per luma step above the threshold.
const GLOW_RAMP: f32 = 3.0;

/// Opacity multiplier applied to the softness slider.
const GLOW_OPACITY_SCALE: f32 = 1.2;

/// Mask alpha (0–255) for a pixel with the given luma.
pub fn mask_alpha(l: f32) -> u8 {
    if l < GLOW_THRESHOLD {
        0
    } else {
        quantize((l - GLOW_THRESHOLD) * GLOW_RAMP)
    }
}

/// Composite opacity for a softness value, capped at fully opaque.
pub fn glow_opacity(soft: f32) -> f32 {
    (soft / 100.0 * GLOW_OPACITY_SCALE).clamp(0.0, 1.0)
}

/// Blur standard deviation in half-resolution pixels for a full-resolution width.
pub fn glow_sigma(width: u32) -> f32 {
    (width as f32 / 100.0).max(2.0)
}

/// Apply the soft-glow effect in place. No-op when `soft <= 0` or the raster is
/// too small to halve.
pub fn apply_soft_glow(raster: &mut Raster, soft: f32) {
    if soft <= 0.0 {
        return;
    }
    let (width, height) = (raster.width as usize, raster.height as usize);
    let (half_w, half_h) = (width / 2, height / 2);
    if half_w == 0 || half_h == 0 {
        return;
    }

    let mask: Vec<Rgba> = raster
        .pixels
        .iter()
        .map(|px| {
            let l = luma([px[0] as f32, px[1] as f32, px[2] as f32]);
            let a = mask_alpha(l) as f32 / 255.0;
            [
                px[0] as f32 / 255.0 * a,
                px[1] as f32 / 255.0 * a,
                px[2] as f32 / 255.0 * a,
                a,
            ]
        })
        .collect();

    let sigma = glow_sigma(raster.width);
    let mut small = resample_bilinear(&mask, width, height, half_w, half_h);
    gaussian_blur(&mut small, half_w, half_h, sigma);
    let glow = resample_bilinear(&small, half_w, half_h, width, height);

    let opacity = glow_opacity(soft);
    debug!(width, height, sigma, opacity, "soft glow");

    for (px, src) in raster.pixels.iter_mut().zip(&glow) {
        *px = screen_over(*px, src, opacity);
    }
}

/// Screen-blend a premultiplied source over an unpremultiplied destination with
/// source-over alpha compositing.
fn screen_over(dst: [u8; 4], src: &Rgba, opacity: f32) -> [u8; 4] {
    let src_alpha = src[3].clamp(0.0, 1.0);
    let a_s = src_alpha * opacity;
    if a_s <= 0.0 {
        return dst;
    }
    let a_b = dst[3] as f32 / 255.0;
    let a_o = a_s + a_b * (1.0 - a_s);

    let mut out = [0u8; 4];
    for c in 0..3 {
        let cs = (src[c] / src_alpha).clamp(0.0, 1.0);
        let cb = dst[c] as f32 / 255.0;
        let blended = cs + cb - cs * cb;
        let co = a_s * (1.0 - a_b) * cs + a_s * a_b * blended + (1.0 - a_s) * a_b * cb;
        out[c] = quantize(co / a_o * 255.0);
    }
    out[3] = quantize(a_o * 255.0);
    out
}
