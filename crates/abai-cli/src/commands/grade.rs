//! Grade command: load, crop, adjust, filter, render, export.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use abai_core::io::{export, export_to};
use abai_core::{Document, EditParameters, EditorConfig, FilterCatalog, FilterId};

use crate::GradeArgs;

pub fn run(args: GradeArgs) -> Result<()> {
    let mut config = EditorConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = &args.lut_dir {
        config.builtin_lut_dir = dir.clone();
    }
    if let Some(quality) = args.quality {
        config.export_quality = quality;
    }

    let mut doc = Document::load(&args.input, &config)
        .with_context(|| format!("Failed to load: {}", args.input.display()))?;

    let mut catalog = FilterCatalog::new();
    let filter = select_filter(&mut catalog, &args, &config)?;

    if let Some(rect) = args.crop {
        doc.begin_crop();
        doc.crop(rect).context("Crop rejected")?;
    }

    if let Some(path) = &args.params {
        doc.set_params(read_params(path)?)?;
    }
    if !args.set.is_empty() {
        for (slider, value) in &args.set {
            debug!(%slider, value, "slider set");
            doc.set_slider(*slider, *value);
        }
        doc.commit()?;
    }
    if filter != FilterId::Identity {
        doc.select_filter(filter)?;
    }

    let rendered = match args.seed {
        Some(seed) => doc.render_with_rng(&catalog, &mut StdRng::seed_from_u64(seed)),
        None => doc.render(&catalog),
    };

    let output = match args.split {
        Some(split) => {
            doc.set_split(split);
            doc.composite(&rendered)?
        }
        None => rendered,
    };

    let path = match &args.output {
        Some(path) => {
            export_to(&output, path, config.export_quality)
                .with_context(|| format!("Failed to save: {}", path.display()))?;
            path.clone()
        }
        None => export(&output, &args.out_dir, config.export_quality)
            .with_context(|| format!("Failed to export into: {}", args.out_dir.display()))?,
    };

    info!(
        snapshots = doc.history().len(),
        width = output.width,
        height = output.height,
        "graded"
    );
    println!("{}", path.display());
    Ok(())
}

fn select_filter(
    catalog: &mut FilterCatalog,
    args: &GradeArgs,
    config: &EditorConfig,
) -> Result<FilterId> {
    if let Some(path) = &args.cube {
        return catalog
            .import_cube_file(path)
            .with_context(|| format!("Invalid LUT: {}", path.display()));
    }

    let Some(name) = &args.builtin else {
        return Ok(FilterId::Identity);
    };

    let loaded = catalog.load_builtin(&config.builtin_lut_dir, config.builtin_lut_size);
    if loaded == 0 {
        warn!(dir = %config.builtin_lut_dir.display(), "no built-in filters found");
    }
    match catalog.find_by_name(name) {
        Some(filter) => Ok(filter.id),
        None => {
            let available: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
            bail!("Unknown filter '{name}'. Available: {}", available.join(", "))
        }
    }
}

fn read_params(path: &Path) -> Result<EditParameters> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid parameters: {}", path.display()))
}
