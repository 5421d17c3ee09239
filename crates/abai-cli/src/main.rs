//! abai - headless color grading
//!
//! Loads an image, applies sliders and a filter, and exports a JPEG.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use abai_core::{CropRect, Slider};

mod commands;

#[derive(Parser)]
#[command(name = "abai")]
#[command(author, version, about = "Raster color grading with film LUTs")]
#[command(long_about = "
Applies exposure, contrast, tone, white balance, saturation and vibrance,
an optional LUT filter, soft glow and grain, then exports a JPEG.

Examples:
  abai grade photo.jpg                              # defaults, written to ./ABAI_Pro_<ts>.jpg
  abai grade photo.jpg -o out.jpg --set exposure=20 --set vib=35
  abai grade photo.jpg --builtin \"Abai Fuji\" --set lutAmount=70
  abai grade photo.jpg --cube look.cube --crop 100,50,800,600
  abai grade photo.jpg --params look.json --split 0.5 --seed 7
  abai lut-info look.cube
  abai lut-info \"Abai Film_grid.png\" --size 64
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an image and export it as JPEG
    #[command(visible_alias = "g")]
    Grade(GradeArgs),

    /// Parse a LUT file and print its size
    #[command(name = "lut-info", visible_alias = "li")]
    LutInfo(LutInfoArgs),
}

#[derive(Args)]
struct GradeArgs {
    /// Input image
    input: PathBuf,

    /// Output file (default: timestamped name in --out-dir)
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for the timestamped export
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Slider assignment, e.g. exposure=20 (repeatable)
    #[arg(short, long = "set", value_parser = parse_assignment)]
    set: Vec<(Slider, f32)>,

    /// JSON parameter file, applied before --set
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Import a .cube LUT and select it
    #[arg(long, conflicts_with = "builtin")]
    cube: Option<PathBuf>,

    /// Select a built-in filter by name
    #[arg(short, long)]
    builtin: Option<String>,

    /// Directory holding the built-in HALD grids
    #[arg(long)]
    lut_dir: Option<PathBuf>,

    /// Crop rectangle x,y,w,h in source pixels
    #[arg(long, value_parser = parse_crop)]
    crop: Option<CropRect>,

    /// Export the before/after split view at this position (0-1)
    #[arg(long)]
    split: Option<f32>,

    /// Seed for reproducible grain
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JPEG quality override (1-100)
    #[arg(short, long)]
    quality: Option<u8>,
}

#[derive(Args)]
struct LutInfoArgs {
    /// .cube file or HALD grid image
    input: PathBuf,

    /// Cube size of a HALD grid image
    #[arg(short, long, default_value = "64")]
    size: usize,
}

/// Parse `name=value` into a slider assignment.
fn parse_assignment(s: &str) -> Result<(Slider, f32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let slider: Slider = name.trim().parse().map_err(|e| format!("{e}"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value for {slider}: '{value}'"))?;
    Ok((slider, value))
}

/// Parse `x,y,w,h` into a crop rectangle.
fn parse_crop(s: &str) -> Result<CropRect, String> {
    let parts: Vec<i64> = s
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid crop '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(CropRect::new(*x, *y, *w, *h)),
        _ => Err(format!("crop needs 4 values x,y,w,h, got {}", parts.len())),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Grade(args) => commands::grade::run(args),
        Commands::LutInfo(args) => commands::lut_info::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("exposure=20").unwrap(), (Slider::Exposure, 20.0));
        assert_eq!(parse_assignment("lutAmount = 55.5").unwrap(), (Slider::LutAmount, 55.5));
        assert!(parse_assignment("exposure").is_err());
        assert!(parse_assignment("gamma=1").is_err());
        assert!(parse_assignment("sat=lots").is_err());
    }

    #[test]
    fn test_parse_crop() {
        assert_eq!(parse_crop("1, 2,30,40").unwrap(), CropRect::new(1, 2, 30, 40));
        assert!(parse_crop("1,2,3").is_err());
        assert!(parse_crop("a,b,c,d").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
