//! Linear undo/redo history.
//!
//! Snapshots are either parameter-only or carry a full raster. Pushing while
//! the cursor is not at the end discards every snapshot after it. The first
//! snapshot is always an image snapshot, so every parameter snapshot resolves
//! to a base raster by scanning backward.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HistoryError;
use crate::image::Raster;
use crate::transform::params::{EditParameters, FilterId};

/// Parameters plus selected filter: everything a snapshot records besides the raster.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EditState {
    pub params: EditParameters,
    pub filter: FilterId,
}

impl EditState {
    pub fn new(params: EditParameters, filter: FilterId) -> Self {
        Self { params, filter }
    }
}

/// Snapshot kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Param,
    Image,
}

/// One recorded history entry. Immutable once pushed.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Param(EditState),
    Image { state: EditState, raster: Arc<Raster> },
}

impl Snapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Param(_) => SnapshotKind::Param,
            Snapshot::Image { .. } => SnapshotKind::Image,
        }
    }

    pub fn state(&self) -> &EditState {
        match self {
            Snapshot::Param(state) | Snapshot::Image { state, .. } => state,
        }
    }

    pub fn raster(&self) -> Option<&Arc<Raster>> {
        match self {
            Snapshot::Param(_) => None,
            Snapshot::Image { raster, .. } => Some(raster),
        }
    }
}

/// What the document needs to apply after moving the cursor.
#[derive(Debug, Clone)]
pub struct Restoration {
    /// Cursor position that was restored.
    pub index: usize,
    pub state: EditState,
    /// Raster of the nearest image snapshot at or before `index`.
    pub base: Arc<Raster>,
}

/// Snapshot list with a movable cursor.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot, truncating any redoable entries first.
    ///
    /// `Image` snapshots require `raster`, which is copied into the history.
    /// `Param` snapshots ignore it.
    pub fn push(
        &mut self,
        kind: SnapshotKind,
        state: EditState,
        raster: Option<&Raster>,
    ) -> Result<(), HistoryError> {
        let snapshot = match kind {
            SnapshotKind::Image => Snapshot::Image {
                state,
                raster: Arc::new(raster.ok_or(HistoryError::MissingRaster)?.clone()),
            },
            SnapshotKind::Param => {
                if self.snapshots.is_empty() {
                    return Err(HistoryError::NoBaseImage);
                }
                Snapshot::Param(state)
            }
        };

        if !self.snapshots.is_empty() {
            let dropped = self.snapshots.len() - (self.cursor + 1);
            if dropped > 0 {
                debug!(dropped, "discarding redo branch");
            }
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        debug!(?kind, index = self.cursor, filter = %state.filter, "history push");
        Ok(())
    }

    pub fn push_param(&mut self, state: EditState) -> Result<(), HistoryError> {
        self.push(SnapshotKind::Param, state, None)
    }

    pub fn push_image(&mut self, state: EditState, raster: &Raster) -> Result<(), HistoryError> {
        self.push(SnapshotKind::Image, state, Some(raster))
    }

    /// Step back one snapshot. `None` when already at the start.
    pub fn undo(&mut self) -> Option<Restoration> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.restore(self.cursor).ok()
    }

    /// Step forward one snapshot. `None` when already at the end.
    pub fn redo(&mut self) -> Option<Restoration> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.restore(self.cursor).ok()
    }

    /// Resolve the snapshot at `index` to its state and base raster.
    ///
    /// Does not move the cursor.
    pub fn restore(&self, index: usize) -> Result<Restoration, HistoryError> {
        let snapshot = self
            .snapshots
            .get(index)
            .ok_or(HistoryError::OutOfRange(index))?;
        let base = self.snapshots[..=index]
            .iter()
            .rev()
            .find_map(Snapshot::raster)
            .ok_or(HistoryError::NoBaseImage)?;
        debug!(index, kind = ?snapshot.kind(), "history restore");
        Ok(Restoration {
            index,
            state: *snapshot.state(),
            base: Arc::clone(base),
        })
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Cursor position. Meaningless while empty.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(exposure: f32) -> EditState {
        EditState::new(
            EditParameters {
                exposure,
                ..Default::default()
            },
            FilterId::Identity,
        )
    }

    fn seeded() -> HistoryManager {
        let mut history = HistoryManager::new();
        history
            .push_image(state(0.0), &Raster::filled(4, 4, [1, 2, 3, 255]))
            .unwrap();
        history
    }

    #[test]
    fn test_param_first_is_rejected() {
        let mut history = HistoryManager::new();
        assert_eq!(history.push_param(state(1.0)), Err(HistoryError::NoBaseImage));
        assert!(history.is_empty());
    }

    #[test]
    fn test_image_without_raster_is_rejected() {
        let mut history = HistoryManager::new();
        assert_eq!(
            history.push(SnapshotKind::Image, state(0.0), None),
            Err(HistoryError::MissingRaster)
        );
    }

    #[test]
    fn test_undo_redo_at_ends_are_noops() {
        let mut history = seeded();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_param_restore_finds_preceding_image() {
        let mut history = seeded();
        history.push_param(state(10.0)).unwrap();
        let cropped = Raster::filled(2, 2, [9, 9, 9, 255]);
        history.push_image(state(10.0), &cropped).unwrap();
        history.push_param(state(20.0)).unwrap();

        let r = history.restore(1).unwrap();
        assert_eq!(r.state.params.exposure, 10.0);
        assert_eq!(r.base.dimensions(), (4, 4));

        let r = history.restore(3).unwrap();
        assert_eq!(r.base.as_ref(), &cropped);
        assert!(Arc::ptr_eq(&r.base, history.snapshots()[2].raster().unwrap()));
    }

    #[test]
    fn test_push_truncates_redo_branch() {
        let mut history = seeded();
        history.push_param(state(1.0)).unwrap();
        history.push_param(state(2.0)).unwrap();
        history.undo().unwrap();
        history.undo().unwrap();

        history.push_param(state(3.0)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(history.redo().is_none());
        assert_eq!(history.restore(1).unwrap().state.params.exposure, 3.0);
    }

    #[test]
    fn test_restore_out_of_range() {
        let history = seeded();
        assert_eq!(history.restore(5).unwrap_err(), HistoryError::OutOfRange(5));
    }

    #[test]
    fn test_snapshot_raster_is_a_copy() {
        let mut history = HistoryManager::new();
        let mut live = Raster::filled(2, 2, [0, 0, 0, 255]);
        history.push_image(state(0.0), &live).unwrap();
        live.pixels[0] = [255, 255, 255, 255];
        assert_eq!(history.restore(0).unwrap().base.pixels[0], [0, 0, 0, 255]);
    }
}
