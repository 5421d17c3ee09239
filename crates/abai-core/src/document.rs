//! Editing session: source raster, live parameters, selected filter, history.
//!
//! The source raster is the unprocessed "original for this snapshot". Renders
//! always start from it; crops replace it and record an image snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::compositor::compose_split;
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::filters::FilterCatalog;
use crate::history::{EditState, HistoryManager, Restoration};
use crate::image::{CropRect, MIN_CROP_SIZE, Raster};
use crate::io;
use crate::pipeline::{render, render_with_rng};
use crate::scheduler::RenderJob;
use crate::transform::params::{EditParameters, FilterId, Slider};

/// One open image and its editing state.
#[derive(Debug, Clone)]
pub struct Document {
    source: Arc<Raster>,
    params: EditParameters,
    filter: FilterId,
    history: HistoryManager,
    cropping: bool,
    split: f32,
    min_crop_size: u32,
}

impl Document {
    /// Open a decoded raster with default parameters and one image snapshot.
    pub fn open(raster: Raster) -> Self {
        Self::open_with(raster, MIN_CROP_SIZE, 0.5)
    }

    /// Open with crop limit and split position taken from `config`.
    pub fn with_config(raster: Raster, config: &EditorConfig) -> Self {
        Self::open_with(raster, config.min_crop_size, config.split_position)
    }

    /// Decode a file (downscaled per `config`) and open it.
    pub fn load(path: &Path, config: &EditorConfig) -> Result<Self, EditError> {
        let raster = io::load_image(path, config.max_dimension)?;
        Ok(Self::with_config(raster, config))
    }

    fn open_with(raster: Raster, min_crop_size: u32, split: f32) -> Self {
        let mut doc = Self {
            source: Arc::new(Raster::filled(1, 1, [0; 4])),
            params: EditParameters::default(),
            filter: FilterId::Identity,
            history: HistoryManager::new(),
            cropping: false,
            split: split.clamp(0.0, 1.0),
            min_crop_size,
        };
        doc.replace_image(raster);
        doc
    }

    /// Load a new image into this document: history restarts with one image snapshot.
    ///
    /// Parameters and filter selection carry over.
    pub fn replace_image(&mut self, raster: Raster) {
        self.history.clear();
        self.cropping = false;
        self.record_image(raster);
        debug!(
            width = self.source.width,
            height = self.source.height,
            "document opened"
        );
    }

    fn state(&self) -> EditState {
        EditState::new(self.params, self.filter)
    }

    /// Push an image snapshot and adopt the stored copy as the source.
    fn record_image(&mut self, raster: Raster) {
        let state = self.state();
        // An image push with a raster cannot fail.
        if let Err(e) = self.history.push_image(state, &raster) {
            warn!("image snapshot rejected: {e}");
        }
        self.source = match self.history.snapshots().last().and_then(|s| s.raster()) {
            Some(stored) => Arc::clone(stored),
            None => Arc::new(raster),
        };
    }

    fn record_param(&mut self) -> Result<(), EditError> {
        self.history.push_param(self.state())?;
        Ok(())
    }

    // ── Parameters ─────────────────────────────────────────────

    /// Live change while a slider is dragged. No history entry.
    pub fn set_slider(&mut self, slider: Slider, value: f32) {
        self.params.set(slider, value);
    }

    /// Record the current parameters (slider released).
    pub fn commit(&mut self) -> Result<(), EditError> {
        self.record_param()
    }

    /// Replace all parameters and record them.
    pub fn set_params(&mut self, params: EditParameters) -> Result<(), EditError> {
        self.params = params;
        self.record_param()
    }

    /// Restore one slider to its default and record it.
    pub fn reset_slider(&mut self, slider: Slider) -> Result<(), EditError> {
        self.params.set(slider, slider.default_value());
        self.record_param()
    }

    /// Select a filter and record it.
    pub fn select_filter(&mut self, filter: FilterId) -> Result<(), EditError> {
        self.filter = filter;
        debug!(%filter, "filter selected");
        self.record_param()
    }

    /// All parameters to defaults, identity filter, recorded.
    pub fn reset(&mut self) -> Result<(), EditError> {
        self.params = EditParameters::default();
        self.filter = FilterId::Identity;
        info!("all settings reset");
        self.record_param()
    }

    // ── Crop ───────────────────────────────────────────────────

    pub fn begin_crop(&mut self) {
        self.cropping = true;
    }

    pub fn cancel_crop(&mut self) {
        self.cropping = false;
    }

    /// Crop the source to `rect` (clamped to bounds) and record an image snapshot.
    ///
    /// A rectangle smaller than the minimum after clamping leaves the document
    /// untouched, including the crop session.
    pub fn crop(&mut self, rect: CropRect) -> Result<(), EditError> {
        let clamped = match rect.clamp_to(self.source.width, self.source.height, self.min_crop_size)
        {
            Ok(clamped) => clamped,
            Err(e) => {
                warn!(?rect, "crop rejected: {e}");
                return Err(e);
            }
        };
        let cropped = self.source.crop(&clamped);
        self.cropping = false;
        self.record_image(cropped);
        info!(
            x = clamped.x,
            y = clamped.y,
            width = clamped.width,
            height = clamped.height,
            "crop applied"
        );
        Ok(())
    }

    // ── History ────────────────────────────────────────────────

    /// Step back. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(restoration) => {
                self.apply_restoration(restoration);
                true
            }
            None => false,
        }
    }

    /// Step forward. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(restoration) => {
                self.apply_restoration(restoration);
                true
            }
            None => false,
        }
    }

    fn apply_restoration(&mut self, restoration: Restoration) {
        if !Arc::ptr_eq(&self.source, &restoration.base) {
            debug!(
                index = restoration.index,
                width = restoration.base.width,
                height = restoration.base.height,
                "switching base raster"
            );
            self.source = restoration.base;
        }
        self.params = restoration.state.params;
        self.filter = restoration.state.filter;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Output ─────────────────────────────────────────────────

    /// Render the current state from the source raster.
    pub fn render(&self, catalog: &FilterCatalog) -> Raster {
        render(&self.source, &self.params, &catalog.resolve(self.filter))
    }

    /// Render with an explicit grain noise source.
    pub fn render_with_rng<R: Rng + ?Sized>(&self, catalog: &FilterCatalog, rng: &mut R) -> Raster {
        render_with_rng(&self.source, &self.params, &catalog.resolve(self.filter), rng)
    }

    /// Snapshot of the current state as a job for a
    /// [`RenderScheduler`](crate::scheduler::RenderScheduler).
    pub fn render_job(&self, catalog: &FilterCatalog, seed: Option<u64>) -> RenderJob {
        RenderJob {
            source: Arc::clone(&self.source),
            params: self.params,
            filter: catalog.resolve(self.filter),
            seed,
        }
    }

    /// Before/after view of an already rendered frame.
    pub fn composite(&self, rendered: &Raster) -> Result<Raster, EditError> {
        compose_split(&self.source, rendered, self.split, self.cropping)
    }

    /// Render and write a timestamped JPEG into `dir`.
    pub fn export(
        &self,
        catalog: &FilterCatalog,
        dir: &Path,
        quality: u8,
    ) -> Result<PathBuf, EditError> {
        io::export(&self.render(catalog), dir, quality)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn source(&self) -> &Raster {
        &self.source
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    pub fn params(&self) -> &EditParameters {
        &self.params
    }

    pub fn filter(&self) -> FilterId {
        self.filter
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn is_cropping(&self) -> bool {
        self.cropping
    }

    pub fn split(&self) -> f32 {
        self.split
    }

    pub fn set_split(&mut self, split: f32) {
        self.split = split.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SnapshotKind;

    fn doc() -> Document {
        Document::open(Raster::filled(100, 100, [60, 60, 60, 255]))
    }

    #[test]
    fn test_open_records_one_image_snapshot() {
        let doc = doc();
        assert_eq!(doc.history().len(), 1);
        assert_eq!(doc.history().snapshots()[0].kind(), SnapshotKind::Image);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_live_slider_does_not_record() {
        let mut doc = doc();
        doc.set_slider(Slider::Exposure, 30.0);
        assert_eq!(doc.history().len(), 1);
        doc.commit().unwrap();
        assert_eq!(doc.history().len(), 2);
        assert_eq!(doc.params().exposure, 30.0);
    }

    #[test]
    fn test_reset_slider_restores_default() {
        let mut doc = doc();
        doc.set_slider(Slider::Soft, 90.0);
        doc.reset_slider(Slider::Soft).unwrap();
        assert_eq!(doc.params().soft, 50.0);
        assert_eq!(doc.history().snapshots()[1].kind(), SnapshotKind::Param);
    }

    #[test]
    fn test_crop_then_undo_restores_source() {
        let mut doc = doc();
        doc.begin_crop();
        doc.crop(CropRect::new(5, 5, 20, 30)).unwrap();
        assert_eq!(doc.dimensions(), (20, 30));
        assert!(!doc.is_cropping());

        assert!(doc.undo());
        assert_eq!(doc.dimensions(), (100, 100));
        assert!(doc.redo());
        assert_eq!(doc.dimensions(), (20, 30));
    }

    #[test]
    fn test_rejected_crop_changes_nothing() {
        let mut doc = doc();
        doc.begin_crop();
        assert!(matches!(
            doc.crop(CropRect::new(0, 0, 5, 50)),
            Err(EditError::CropTooSmall { .. })
        ));
        assert_eq!(doc.dimensions(), (100, 100));
        assert_eq!(doc.history().len(), 1);
        assert!(doc.is_cropping());
    }

    #[test]
    fn test_reset_selects_identity() {
        let mut doc = doc();
        doc.select_filter(FilterId::User(3)).unwrap();
        doc.set_slider(Slider::Grain, 40.0);
        doc.reset().unwrap();
        assert_eq!(doc.filter(), FilterId::Identity);
        assert_eq!(*doc.params(), EditParameters::default());
        assert_eq!(doc.history().len(), 3);
    }

    #[test]
    fn test_composite_respects_crop_session() {
        let mut doc = doc();
        let rendered = Raster::filled(100, 100, [0, 0, 0, 255]);
        let view = doc.composite(&rendered).unwrap();
        assert_eq!(view.get(0, 0), Some([60, 60, 60, 255]));
        doc.begin_crop();
        assert_eq!(doc.composite(&rendered).unwrap(), rendered);
    }
}
