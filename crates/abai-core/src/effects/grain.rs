//! Monochrome film grain.

use rand::Rng;

use crate::image::{Raster, quantize};

/// Noise span per unit of grain: samples fall in `±grain × 0.2`.
const GRAIN_SPAN: f32 = 0.4;

/// Add one uniform noise sample per pixel to R, G and B alike. Alpha is untouched.
pub fn apply_grain<R: Rng + ?Sized>(raster: &mut Raster, grain: f32, rng: &mut R) {
    if grain <= 0.0 {
        return;
    }
    let span = grain * GRAIN_SPAN;
    for px in &mut raster.pixels {
        let n = (rng.r#gen::<f32>() - 0.5) * span;
        for c in 0..3 {
            px[c] = quantize(px[c] as f32 + n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_grain_stays_within_amplitude() {
        let mut raster = Raster::filled(32, 32, [128, 128, 128, 77]);
        let mut rng = StdRng::seed_from_u64(7);
        apply_grain(&mut raster, 50.0, &mut rng);
        for px in &raster.pixels {
            for c in 0..3 {
                assert!((px[c] as i32 - 128).abs() <= 10, "{px:?}");
            }
            assert_eq!(px[3], 77);
        }
    }

    #[test]
    fn test_grain_is_monochrome() {
        let mut raster = Raster::filled(8, 8, [100, 100, 100, 255]);
        let mut rng = StdRng::seed_from_u64(1);
        apply_grain(&mut raster, 100.0, &mut rng);
        assert!(raster.pixels.iter().all(|px| px[0] == px[1] && px[1] == px[2]));
        assert!(raster.pixels.iter().any(|px| px[0] != 100));
    }

    #[test]
    fn test_same_seed_same_grain() {
        let base = Raster::filled(8, 8, [60, 120, 180, 255]);
        let mut a = base.clone();
        let mut b = base.clone();
        apply_grain(&mut a, 40.0, &mut StdRng::seed_from_u64(99));
        apply_grain(&mut b, 40.0, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_grain_is_noop() {
        let mut raster = Raster::filled(4, 4, [1, 2, 3, 4]);
        apply_grain(&mut raster, 0.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(raster, Raster::filled(4, 4, [1, 2, 3, 4]));
    }
}
