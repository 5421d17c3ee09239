//! LUT inspection command

use anyhow::{Context, Result};
use tracing::info;

use abai_core::transform::{cube, hald};

use crate::LutInfoArgs;

pub fn run(args: LutInfoArgs) -> Result<()> {
    let is_cube = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cube"));

    let lut = if is_cube {
        cube::read_cube(&args.input)
    } else {
        hald::read_hald(&args.input, args.size)
    }
    .with_context(|| format!("Invalid LUT: {}", args.input.display()))?;

    info!(path = %args.input.display(), size = lut.size(), "LUT parsed");
    println!("{}", args.input.display());
    println!("  format:  {}", if is_cube { "cube" } else { "hald" });
    println!("  size:    {}", lut.size());
    println!("  entries: {}", lut.len());
    Ok(())
}
