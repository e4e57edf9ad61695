use eframe_design::element::{MediaSource, MediaVariant, ShapeVariant};
use eframe_design::properties::PropertyEdit;
use eframe_design::state::{
    Autosave, EditorSnapshot, FileStore, MemoryStore, SaveReason, SnapshotStore, StatusMessage, load_snapshot,
    save_snapshot,
};
use eframe_design::{EditorConfig, EditorContext};
use egui::{Color32, Vec2};
use tempfile::tempdir;

/// A session with one element of each kind on the first page and a shape on a second
fn populated_context() -> EditorContext {
    let mut ctx = EditorContext::default();
    ctx.set_canvas_size(Vec2::new(1080.0, 1080.0)).unwrap();
    ctx.create_text_element("Grand opening", 48.0);
    ctx.end_text_edit();
    ctx.create_shape_element(ShapeVariant::Circle);
    ctx.edit_selected(PropertyEdit::Fill(Color32::from_rgb(0x33, 0x66, 0x99)), false);
    ctx.edit_selected(PropertyEdit::Rotation(15.0), false);
    ctx.create_media_element(
        MediaVariant::Image,
        MediaSource::inline("image/png", vec![137, 80, 78, 71]),
        Some(Vec2::new(800.0, 400.0)),
    );
    ctx.set_background_image(MediaSource::url("https://example.test/bg.jpg"));
    ctx.add_page();
    ctx.create_shape_element(ShapeVariant::Arrow);
    ctx
}

#[test]
fn test_snapshot_round_trip() {
    let mut original = populated_context();
    let mut store = MemoryStore::new();
    save_snapshot(&original, &mut store, "design").unwrap();

    let mut restored = EditorContext::default();
    let snapshot = load_snapshot(&store, "design").unwrap().unwrap();
    snapshot.restore(&mut restored).unwrap();

    assert_eq!(restored.page_size(), Vec2::new(1080.0, 1080.0));
    assert_eq!(restored.pages().page_count(), 2);
    assert_eq!(restored.pages().current_id(), original.pages().current_id());

    let before = original.pages_for_export();
    let after = restored.pages_for_export();
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.background, b.background);
        assert_eq!(a.elements.len(), b.elements.len());
        for (x, y) in a.elements.iter().zip(&b.elements) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.kind(), y.kind());
            assert_eq!(x.position, y.position);
            assert_eq!(x.size, y.size);
            assert_eq!(x.z_index, y.z_index);
            assert_eq!(x.style_string(), y.style_string());
            assert_eq!(x.content(), y.content());
        }
    }
}

#[test]
fn test_restored_elements_are_interactive() {
    let original = populated_context();
    let json = EditorSnapshot::new(&original).to_json().unwrap();

    let mut restored = EditorContext::default();
    EditorSnapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();

    for element in restored.canvas().elements() {
        assert!(restored.canvas().is_mounted(element.id));
    }
    assert!(!restored.can_undo());
}

#[test]
fn test_snapshot_field_names() {
    let ctx = populated_context();
    let json = EditorSnapshot::new(&ctx).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["canvasWidth"], 1080.0);
    assert!(value["lastSaved"].is_string());
    assert!(value["pages"].is_array());
    let element = &value["pages"][0]["elements"][0];
    assert_eq!(element["type"], "text");
    assert_eq!(element["content"], "Grand opening");
    assert!(element["style"].as_str().unwrap().contains("font-size: 48px"));
}

#[test]
fn test_session_save_reports_status() {
    let mut ctx = populated_context();
    let mut store = MemoryStore::new();
    assert!(ctx.save_session(&mut store, 10.0));
    assert_eq!(ctx.status(10.5).map(|s| s.text.as_str()), Some(StatusMessage::SAVED));
    assert!(ctx.status(13.0).is_none());

    let mut full = MemoryStore::read_only();
    assert!(!ctx.save_session(&mut full, 20.0));
    let status = ctx.status(20.0).unwrap();
    assert_eq!(status.text, StatusMessage::SAVE_FAILED);
    assert!(status.is_error);
}

#[test]
fn test_restore_session_without_data() {
    let mut ctx = EditorContext::default();
    assert!(!ctx.restore_session(&MemoryStore::new(), 0.0));
    assert!(ctx.status(0.0).is_none());
}

#[test]
fn test_corrupt_session_reports_error() {
    let config = EditorConfig::default();
    let mut store = MemoryStore::new();
    store.write(&config.autosave.storage_key, "{ not json").unwrap();

    let mut ctx = EditorContext::new(config);
    assert!(!ctx.restore_session(&store, 0.0));
    assert_eq!(ctx.status(0.0).map(|s| s.text.as_str()), Some(StatusMessage::RESTORE_FAILED));
    assert_eq!(ctx.pages().page_count(), 1);
}

#[test]
fn test_out_of_range_snapshot_is_rejected() {
    let ctx = EditorContext::default();
    let mut snapshot = EditorSnapshot::new(&ctx);
    snapshot.canvas_width = 10_000.0;

    let mut target = EditorContext::default();
    assert!(snapshot.restore(&mut target).is_err());
    assert_eq!(target.page_size(), Vec2::new(800.0, 600.0));
}

#[test]
fn test_file_store_rotates_autosaves() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).with_max_autosaves(3);
    let mut ctx = EditorContext::default();

    for _ in 0..5 {
        ctx.create_shape_element(ShapeVariant::Rectangle);
        assert!(ctx.save_session(&mut store, 0.0));
    }

    assert_eq!(store.autosave_count().unwrap(), 3);
    let latest = store.find_latest_autosave().unwrap().unwrap();
    let snapshot = EditorSnapshot::from_json(&std::fs::read_to_string(latest).unwrap()).unwrap();
    assert_eq!(snapshot.elements.len(), 5);

    let mut restored = EditorContext::default();
    assert!(restored.restore_session(&store, 1.0));
    assert_eq!(restored.canvas().len(), 5);
}

#[test]
fn test_dirty_generation_drives_autosave() {
    let config = EditorConfig::default();
    let mut ctx = EditorContext::new(config.clone());
    let mut autosave = Autosave::new(&config.autosave, 0.0);
    assert_eq!(autosave.tick(ctx.dirty_generation(), 0.5), None);

    ctx.create_shape_element(ShapeVariant::Star);
    assert_eq!(autosave.tick(ctx.dirty_generation(), 1.0), None);
    assert!(autosave.has_pending_change());
    assert_eq!(autosave.tick(ctx.dirty_generation(), 2.0), Some(SaveReason::Debounced));

    autosave.mark_saved(2.0);
    assert_eq!(autosave.tick(ctx.dirty_generation(), 20.0), None);
    assert_eq!(autosave.tick(ctx.dirty_generation(), 32.0), Some(SaveReason::Interval));
}
