//! Abai Core: raster color grading with undo/redo.
//!
//! This crate holds the pixel pipeline (adjustments, LUT blend, glow, grain),
//! LUT import, the snapshot history, and the editing document that ties them
//! together. It has no UI; front ends drive a [`Document`] and render it with
//! a [`FilterCatalog`].

pub mod compositor;
pub mod config;
pub mod document;
pub mod effects;
pub mod error;
pub mod filters;
pub mod grading;
pub mod history;
pub mod image;
pub mod io;
pub mod pipeline;
pub mod scheduler;
pub mod transform;

// Re-exports for convenience.
pub use compositor::compose_split;
pub use config::EditorConfig;
pub use document::Document;
pub use error::{ConfigError, EditError, HistoryError, LutError};
pub use filters::{Filter, FilterCatalog};
pub use history::{EditState, HistoryManager, Snapshot, SnapshotKind};
pub use crate::image::{CropRect, Raster};
pub use pipeline::{render, render_with_rng};
pub use scheduler::{CancellationToken, RenderJob, RenderOutput, RenderScheduler, RenderWorker};
pub use transform::evaluate::evaluate_transform;
pub use transform::lut::LutTable;
pub use transform::params::{EditParameters, FilterBaseline, FilterId, Slider};
