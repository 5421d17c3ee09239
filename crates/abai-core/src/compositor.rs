//! Before/after split view.

use crate::error::EditError;
use crate::image::Raster;

/// Compose the comparison view.
///
/// `rendered` covers the whole frame; `original` is drawn over every column
/// whose center lies left of `split × width`. While `cropping`, the split is
/// forced to show only the rendered image.
pub fn compose_split(
    original: &Raster,
    rendered: &Raster,
    split: f32,
    cropping: bool,
) -> Result<Raster, EditError> {
    if original.dimensions() != rendered.dimensions() {
        return Err(EditError::DimensionMismatch {
            expected: rendered.dimensions(),
            found: original.dimensions(),
        });
    }

    let mut out = rendered.clone();
    if cropping {
        return Ok(out);
    }

    let boundary = split.clamp(0.0, 1.0) * rendered.width as f32;
    let columns = (0..rendered.width)
        .take_while(|&x| x as f32 + 0.5 < boundary)
        .count();
    if columns == 0 {
        return Ok(out);
    }

    let stride = rendered.width as usize;
    for (dst, src) in out
        .pixels
        .chunks_exact_mut(stride)
        .zip(original.pixels.chunks_exact(stride))
    {
        dst[..columns].copy_from_slice(&src[..columns]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEFORE: [u8; 4] = [10, 10, 10, 255];
    const AFTER: [u8; 4] = [200, 200, 200, 255];

    fn pair() -> (Raster, Raster) {
        (Raster::filled(10, 3, BEFORE), Raster::filled(10, 3, AFTER))
    }

    #[test]
    fn test_split_half_shows_original_left() {
        let (before, after) = pair();
        let out = compose_split(&before, &after, 0.5, false).unwrap();
        for y in 0..3 {
            assert_eq!(out.get(4, y), Some(BEFORE));
            assert_eq!(out.get(5, y), Some(AFTER));
        }
    }

    #[test]
    fn test_split_extremes() {
        let (before, after) = pair();
        assert_eq!(compose_split(&before, &after, 0.0, false).unwrap(), after);
        assert_eq!(compose_split(&before, &after, 1.0, false).unwrap(), before);
    }

    #[test]
    fn test_cropping_hides_comparison() {
        let (before, after) = pair();
        assert_eq!(compose_split(&before, &after, 0.8, true).unwrap(), after);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let before = Raster::filled(4, 4, BEFORE);
        let after = Raster::filled(5, 4, AFTER);
        assert!(matches!(
            compose_split(&before, &after, 0.5, false),
            Err(EditError::DimensionMismatch { .. })
        ));
    }
}
