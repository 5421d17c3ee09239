//! Full-raster pixel pipeline.
//!
//! ```text
//!   source ──→ adjust (exposure … vibrance) ──→ LUT blend ──→ soft glow ──→ grain ──→ output
//! ```
//!
//! The pipeline is a pure function of its inputs except for grain, whose noise
//! source is injectable.

use std::time::Instant;

use rand::Rng;
use tracing::debug;

use crate::effects::{apply_grain, apply_soft_glow};
use crate::filters::Filter;
use crate::image::Raster;
use crate::transform::evaluate::{PixelStages, evaluate_transform};
use crate::transform::lut::LutTable;
use crate::transform::params::EditParameters;

/// Render `source` with `params` and `filter`, using thread-local randomness for grain.
pub fn render(source: &Raster, params: &EditParameters, filter: &Filter) -> Raster {
    render_with_rng(source, params, filter, &mut rand::thread_rng())
}

/// Render `source` with an explicit grain noise source.
pub fn render_with_rng<R: Rng + ?Sized>(
    source: &Raster,
    params: &EditParameters,
    filter: &Filter,
    rng: &mut R,
) -> Raster {
    let started = Instant::now();
    let effective = params.with_baseline(&filter.baseline);
    let stages = PixelStages::new(&effective);

    let mut output = if stages.is_neutral() {
        source.clone()
    } else {
        Raster {
            width: source.width,
            height: source.height,
            pixels: source
                .pixels
                .iter()
                .map(|px| evaluate_transform(*px, &stages))
                .collect(),
        }
    };

    if let Some(lut) = filter.lut.as_deref() {
        apply_lut(&mut output, lut, effective.lut_amount / 100.0);
    }

    apply_soft_glow(&mut output, effective.soft);
    apply_grain(&mut output, effective.grain, rng);

    debug!(
        width = source.width,
        height = source.height,
        filter = %filter.id,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "render complete"
    );
    output
}

/// Blend every pixel toward its nearest LUT cell by `amount` (`0.0..=1.0`).
///
/// Alpha is forced to 255 whenever a LUT is active, including at zero blend.
/// Every other stage preserves alpha; this one does not, and callers relying on
/// transparency should keep the filter on identity.
pub fn apply_lut(raster: &mut Raster, lut: &LutTable, amount: f32) {
    let blend = amount > 0.0;
    for px in &mut raster.pixels {
        if blend {
            let [r, g, b] = lut.blend([px[0], px[1], px[2]], amount);
            *px = [r, g, b, 255];
        } else {
            px[3] = 255;
        }
    }
}
