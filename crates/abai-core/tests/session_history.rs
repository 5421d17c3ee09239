//! Document, history, and render scheduling working together.
//!
//! Run with: `cargo test -p abai-core --test session_history`

use abai_core::history::Snapshot;
use abai_core::{
    CropRect, Document, EditError, EditParameters, EditorConfig, FilterCatalog, FilterId,
    HistoryManager, Raster, RenderScheduler, Slider, SnapshotKind,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CUBE_2: &str = "LUT_3D_SIZE 2\n0 0 0\n1 0 0\n0 1 0\n1 1 0\n0 0 1\n1 0 1\n0 1 1\n1 1 1\n";

fn create_test_document() -> Document {
    let mut pixels = Vec::with_capacity(100 * 100);
    for y in 0..100u32 {
        for x in 0..100u32 {
            pixels.push([(x * 2) as u8, (y * 2) as u8, 90, 255]);
        }
    }
    Document::open(Raster::from_pixels(100, 100, pixels).unwrap())
}

/// Everything a restore must reproduce.
fn capture(doc: &Document) -> (EditParameters, FilterId, Raster) {
    (*doc.params(), doc.filter(), doc.source().clone())
}

#[test]
fn test_undo_all_then_redo_all_is_bit_exact() {
    let mut catalog = FilterCatalog::new();
    let lut = catalog.import_cube("tiny", CUBE_2).unwrap();

    let mut doc = create_test_document();
    let mut states = vec![capture(&doc)];

    doc.set_slider(Slider::Exposure, 35.0);
    doc.commit().unwrap();
    states.push(capture(&doc));

    doc.select_filter(lut).unwrap();
    states.push(capture(&doc));

    doc.crop(CropRect::new(10, 20, 50, 40)).unwrap();
    states.push(capture(&doc));

    doc.set_slider(Slider::LutAmount, 40.0);
    doc.commit().unwrap();
    states.push(capture(&doc));

    doc.crop(CropRect::new(0, 0, 30, 30)).unwrap();
    states.push(capture(&doc));

    doc.reset_slider(Slider::Exposure).unwrap();
    states.push(capture(&doc));

    let pushes = states.len() - 1;
    assert_eq!(doc.history().len(), states.len());

    for i in (0..pushes).rev() {
        assert!(doc.undo());
        assert_eq!(capture(&doc), states[i]);
    }
    assert!(!doc.undo());

    for state in &states[1..] {
        assert!(doc.redo());
        assert_eq!(&capture(&doc), state);
    }
    assert!(!doc.redo());
}

#[test]
fn test_new_edit_after_undo_truncates_branch() {
    let mut doc = create_test_document();
    doc.set_slider(Slider::Contrast, 10.0);
    doc.commit().unwrap();
    doc.set_slider(Slider::Contrast, 20.0);
    doc.commit().unwrap();

    assert!(doc.undo());
    assert!(doc.undo());
    assert_eq!(doc.params().contrast, 0.0);

    doc.set_slider(Slider::Sat, -30.0);
    doc.commit().unwrap();

    let kinds: Vec<SnapshotKind> = doc.history().snapshots().iter().map(Snapshot::kind).collect();
    assert_eq!(kinds, [SnapshotKind::Image, SnapshotKind::Param]);
    assert!(!doc.redo());
    assert_eq!(doc.params().sat, -30.0);
    assert_eq!(doc.params().contrast, 0.0);
}

#[test]
fn test_crop_below_minimum_is_rejected() {
    let mut doc = create_test_document();
    let before = capture(&doc);

    let err = doc.crop(CropRect::new(0, 0, 5, 60)).unwrap_err();
    assert!(matches!(err, EditError::CropTooSmall { width: 5, .. }));
    assert_eq!(capture(&doc), before);
    assert_eq!(doc.history().len(), 1);
}

#[test]
fn test_minimum_crop_adds_one_image_snapshot() {
    let mut doc = create_test_document();
    doc.crop(CropRect::new(40, 40, 10, 10)).unwrap();

    let snapshots = doc.history().snapshots();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1].kind(), SnapshotKind::Image);
    let raster = snapshots[1].raster().unwrap();
    assert_eq!(raster.dimensions(), (10, 10));
    assert_eq!(raster.get(0, 0), Some([80, 80, 90, 255]));
    assert_eq!(doc.dimensions(), (10, 10));
}

#[test]
fn test_param_snapshot_after_crop_uses_cropped_base() {
    let mut history = HistoryManager::new();
    let state = Default::default();
    history.push_image(state, &Raster::filled(8, 8, [0; 4])).unwrap();
    history.push_image(state, &Raster::filled(4, 4, [1; 4])).unwrap();
    history.push_param(state).unwrap();

    assert_eq!(history.restore(2).unwrap().base.dimensions(), (4, 4));
    assert_eq!(history.restore(0).unwrap().base.dimensions(), (8, 8));
}

#[test]
fn test_scheduled_render_matches_direct_render() {
    let catalog = FilterCatalog::new();
    let mut doc = create_test_document();
    doc.set_slider(Slider::Grain, 30.0);

    let scheduler = RenderScheduler::new();
    let stale = scheduler.request(doc.render_job(&catalog, Some(3)));
    doc.set_slider(Slider::Exposure, -40.0);
    let latest = scheduler.request(doc.render_job(&catalog, Some(3)));

    let output = scheduler.run_pending().unwrap();
    assert!(stale.token.is_cancelled());
    assert_eq!(output.generation, latest.generation);

    let direct = doc.render_with_rng(&catalog, &mut StdRng::seed_from_u64(3));
    assert_eq!(output.raster, direct);
}

#[test]
fn test_load_and_export_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    Raster::filled(120, 60, [30, 60, 90, 255])
        .to_rgba_image()
        .save(&input)
        .unwrap();

    let config = EditorConfig {
        max_dimension: 64,
        ..Default::default()
    };
    let doc = Document::load(&input, &config).unwrap();
    assert_eq!(doc.dimensions(), (64, 32));

    let catalog = FilterCatalog::new();
    let path = doc.export(&catalog, dir.path(), config.export_quality).unwrap();
    assert!(path.starts_with(dir.path()));
    assert!(path.exists());
}
