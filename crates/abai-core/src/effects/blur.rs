//! Separable blur and bilinear resampling on premultiplied RGBA float buffers.
//!
//! Gaussian blur is approximated by three successive box blurs whose widths are
//! chosen so the combined variance matches the requested standard deviation.
//! Samples outside the buffer count as transparent black.

use tracing::trace;

/// Premultiplied RGBA sample in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Box radii for a three-pass Gaussian approximation of `sigma`.
pub fn gaussian_box_radii(sigma: f32) -> [usize; 3] {
    const PASSES: f32 = 3.0;
    if sigma <= 0.0 {
        return [0; 3];
    }

    let ideal = (12.0 * sigma * sigma / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let lf = lower as f32;
    let m_ideal =
        (12.0 * sigma * sigma - PASSES * lf * lf - 4.0 * PASSES * lf - 3.0 * PASSES) / (-4.0 * lf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    std::array::from_fn(|i| {
        let width = if i < m { lower } else { upper };
        ((width - 1) / 2) as usize
    })
}

/// Blur `buf` in place with a Gaussian of standard deviation `sigma` (in pixels).
pub fn gaussian_blur(buf: &mut [Rgba], width: usize, height: usize, sigma: f32) {
    if width == 0 || height == 0 || buf.len() != width * height {
        return;
    }
    let radii = gaussian_box_radii(sigma);
    trace!(width, height, sigma, ?radii, "gaussian_blur");

    let mut scratch = vec![[0.0; 4]; buf.len()];
    for radius in radii {
        if radius == 0 {
            continue;
        }
        blur_horizontal(buf, &mut scratch, width, height, radius);
        blur_vertical(&scratch, buf, width, height, radius);
    }
}

/// Horizontal box pass.
fn blur_horizontal(src: &[Rgba], dst: &mut [Rgba], width: usize, height: usize, radius: usize) {
    let inv = 1.0 / (2 * radius + 1) as f32;

    for y in 0..height {
        let row = y * width;
        let mut sum = [0.0_f32; 4];
        for x in 0..=radius.min(width - 1) {
            add(&mut sum, &src[row + x]);
        }

        for x in 0..width {
            dst[row + x] = scale(&sum, inv);

            // Slide window
            if x >= radius {
                sub(&mut sum, &src[row + x - radius]);
            }
            if x + radius + 1 < width {
                add(&mut sum, &src[row + x + radius + 1]);
            }
        }
    }
}

/// Vertical box pass.
fn blur_vertical(src: &[Rgba], dst: &mut [Rgba], width: usize, height: usize, radius: usize) {
    let inv = 1.0 / (2 * radius + 1) as f32;

    for x in 0..width {
        let mut sum = [0.0_f32; 4];
        for y in 0..=radius.min(height - 1) {
            add(&mut sum, &src[y * width + x]);
        }

        for y in 0..height {
            dst[y * width + x] = scale(&sum, inv);

            if y >= radius {
                sub(&mut sum, &src[(y - radius) * width + x]);
            }
            if y + radius + 1 < height {
                add(&mut sum, &src[(y + radius + 1) * width + x]);
            }
        }
    }
}

#[inline]
fn add(sum: &mut Rgba, px: &Rgba) {
    for c in 0..4 {
        sum[c] += px[c];
    }
}

#[inline]
fn sub(sum: &mut Rgba, px: &Rgba) {
    for c in 0..4 {
        sum[c] -= px[c];
    }
}

#[inline]
fn scale(sum: &Rgba, k: f32) -> Rgba {
    [sum[0] * k, sum[1] * k, sum[2] * k, sum[3] * k]
}

/// Resample with bilinear filtering, sampling at pixel centers.
pub fn resample_bilinear(
    src: &[Rgba],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<Rgba> {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return Vec::new();
    }

    let sx = src_width as f32 / dst_width as f32;
    let sy = src_height as f32 / dst_height as f32;
    let max_x = (src_width - 1) as f32;
    let max_y = (src_height - 1) as f32;

    let mut dst = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src_height - 1);
        let ty = fy - y0 as f32;

        for x in 0..dst_width {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let tx = fx - x0 as f32;

            let p00 = &src[y0 * src_width + x0];
            let p10 = &src[y0 * src_width + x1];
            let p01 = &src[y1 * src_width + x0];
            let p11 = &src[y1 * src_width + x1];

            dst.push(std::array::from_fn(|c| {
                let top = p00[c] + (p10[c] - p00[c]) * tx;
                let bottom = p01[c] + (p11[c] - p01[c]) * tx;
                top + (bottom - top) * ty
            }));
        }
    }
    dst
}
