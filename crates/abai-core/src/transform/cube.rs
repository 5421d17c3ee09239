//! Adobe/Resolve `.cube` 3D LUT import.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Data lines are red-fastest, which is also the in-memory order of
//! [`LutTable`], so no reordering is needed. Values are scaled by 255 and
//! clamped to `[0, 255]` without rounding.

use std::fs;
use std::path::Path;

use crate::error::{LutError, LutResult};
use crate::transform::lut::{LutTable, MAX_LUT_SIZE};

/// Reads a 3D LUT from a `.cube` file.
pub fn read_cube<P: AsRef<Path>>(path: P) -> LutResult<LutTable> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_cube(&text)
}

/// Parses a 3D LUT from `.cube` text.
pub fn parse_cube(text: &str) -> LutResult<LutTable> {
    let mut size: Option<usize> = None;
    let mut data: Vec<[f32; 3]> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(LutError::Parse("expected 3D LUT, found 1D".into()));
        } else if line.starts_with("TITLE") || line.starts_with("DOMAIN_") {
            continue;
        } else {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            // Only three-token lines are data.
            if tokens.len() != 3 {
                continue;
            }
            data.push(parse_rgb(&tokens, line_no + 1)?);
        }
    }

    let size = size.ok_or(LutError::MissingSize)?;
    let expected = size * size * size;
    if data.len() != expected {
        return Err(LutError::SizeMismatch {
            expected,
            found: data.len(),
        });
    }

    LutTable::from_data(size, data)
}

fn parse_size(line: &str) -> LutResult<usize> {
    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| LutError::Parse(format!("missing value in '{line}'")))?;
    let size: usize = value
        .parse()
        .map_err(|_| LutError::Parse(format!("invalid size '{value}'")))?;
    if size < 2 || size > MAX_LUT_SIZE {
        return Err(LutError::InvalidSize(size));
    }
    Ok(size)
}

fn parse_rgb(tokens: &[&str], line_no: usize) -> LutResult<[f32; 3]> {
    let mut rgb = [0.0_f32; 3];
    for (c, token) in tokens.iter().enumerate() {
        let v: f32 = token
            .parse()
            .map_err(|_| LutError::Parse(format!("line {line_no}: invalid value '{token}'")))?;
        rgb[c] = (v * 255.0).clamp(0.0, 255.0);
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_2: &str = "\
# Created by test
TITLE \"tiny\"
LUT_3D_SIZE 2
DOMAIN_MIN 0 0 0
DOMAIN_MAX 1 1 1

0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
";

    #[test]
    fn test_parse_size_two_cube() {
        let lut = parse_cube(CUBE_2).unwrap();
        assert_eq!(lut.size(), 2);
        assert_eq!(lut.len(), 8);
        assert_eq!(lut.entries()[0], [0.0, 0.0, 0.0]);
        assert_eq!(lut.entries()[1], [255.0, 0.0, 0.0]);
        assert_eq!(lut.entries()[7], [255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_values_are_clamped_not_rounded() {
        let text = CUBE_2.replacen("1 0 0", "1.5 -0.2 0.5", 1);
        let lut = parse_cube(&text).unwrap();
        assert_eq!(lut.entries()[1], [255.0, 0.0, 127.5]);
    }

    #[test]
    fn test_wrong_count_is_rejected() {
        let text = CUBE_2.replacen("\n1 1 1\n", "\n", 1);
        assert!(matches!(
            parse_cube(&text),
            Err(LutError::SizeMismatch { expected: 8, found: 7 })
        ));
    }

    #[test]
    fn test_missing_size_is_rejected() {
        let text = CUBE_2.replacen("LUT_3D_SIZE 2", "", 1);
        assert!(matches!(parse_cube(&text), Err(LutError::MissingSize)));
    }

    #[test]
    fn test_garbage_values_are_rejected() {
        let text = CUBE_2.replacen("0 1 1", "0 one 1", 1);
        assert!(matches!(parse_cube(&text), Err(LutError::Parse(_))));
    }

    #[test]
    fn test_1d_lut_is_rejected() {
        assert!(parse_cube("LUT_1D_SIZE 4\n0 0 0\n").is_err());
    }

    #[test]
    fn test_read_cube_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.cube");
        std::fs::write(&path, CUBE_2).unwrap();
        assert_eq!(read_cube(&path).unwrap().size(), 2);
    }
}
