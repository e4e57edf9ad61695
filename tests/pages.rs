use eframe_design::element::ShapeVariant;
use eframe_design::error::ValidationError;
use eframe_design::{CanvasPreset, EditorContext};
use egui::{Pos2, Vec2};

fn page_names(ctx: &EditorContext) -> Vec<String> {
    ctx.pages().pages().iter().map(|p| p.name.clone()).collect()
}

#[test]
fn test_starts_with_one_page() {
    let ctx = EditorContext::default();
    assert_eq!(ctx.pages().page_count(), 1);
    assert_eq!(page_names(&ctx), vec!["Page 1"]);
    assert_eq!(ctx.pages().count_label(), "Total Pages: 1");
}

#[test]
fn test_delete_middle_page_renumbers() {
    let mut ctx = EditorContext::default();
    ctx.add_page();
    let third = ctx.add_page();
    assert_eq!(ctx.pages().current_id(), third);
    let second = ctx.pages().pages()[1].id;

    ctx.delete_page(second).unwrap();

    assert_eq!(page_names(&ctx), vec!["Page 1", "Page 2"]);
    assert_eq!(ctx.pages().current_id(), third);
    assert_eq!(ctx.pages().count_label(), "Total Pages: 2");
}

#[test]
fn test_deleting_only_page_leaves_blank_page() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);
    let only = ctx.pages().current_id();

    ctx.delete_page(only).unwrap();

    assert_eq!(ctx.pages().page_count(), 1);
    assert_ne!(ctx.pages().current_id(), only);
    assert_eq!(page_names(&ctx), vec!["Page 1"]);
    assert!(ctx.canvas().is_empty());
}

#[test]
fn test_deleting_current_page_loads_first() {
    let mut ctx = EditorContext::default();
    let first = ctx.pages().current_id();
    let second = ctx.add_page();

    ctx.delete_page(second).unwrap();
    assert_eq!(ctx.pages().current_id(), first);
}

#[test]
fn test_pages_keep_their_elements() {
    let mut ctx = EditorContext::default();
    let first = ctx.pages().current_id();
    let shape = ctx.create_shape_element(ShapeVariant::Star);

    ctx.add_page();
    assert!(ctx.canvas().is_empty());
    assert!(ctx.element(shape).is_none());

    ctx.switch_to_page(first).unwrap();
    assert!(ctx.element(shape).is_some());
    assert_eq!(ctx.canvas().len(), 1);
}

#[test]
fn test_page_change_clears_history() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);
    assert!(ctx.can_undo());

    ctx.add_page();
    assert!(!ctx.can_undo());
    assert!(!ctx.can_redo());
}

#[test]
fn test_rename_validation() {
    let mut ctx = EditorContext::default();
    let first = ctx.pages().current_id();
    let second = ctx.add_page();

    assert_eq!(ctx.rename_page(first, "   "), Err(ValidationError::EmptyPageName));
    assert!(matches!(
        ctx.rename_page(first, "Page 2"),
        Err(ValidationError::DuplicatePageName(_))
    ));

    ctx.rename_page(second, "  Cover  ").unwrap();
    assert_eq!(page_names(&ctx), vec!["Page 1", "Cover"]);
    // renaming to its own name is fine
    ctx.rename_page(second, "Cover").unwrap();
}

#[test]
fn test_add_page_renumbers_custom_names() {
    let mut ctx = EditorContext::default();
    let first = ctx.pages().current_id();
    ctx.rename_page(first, "Cover").unwrap();

    ctx.add_page();
    assert_eq!(page_names(&ctx), vec!["Page 1", "Page 2"]);
}

#[test]
fn test_switch_to_unknown_page_fails() {
    let mut ctx = EditorContext::default();
    let gone = ctx.add_page();
    ctx.delete_page(gone).unwrap();
    assert_eq!(ctx.switch_to_page(gone), Err(ValidationError::PageNotFound(gone)));
}

#[test]
fn test_preset_refits_zoom() {
    let mut ctx = EditorContext::default();
    let zoom = ctx.fit_to_viewport(Vec2::new(1280.0, 800.0));
    assert_eq!(zoom, 1.0);

    ctx.apply_preset(CanvasPreset::InstagramPost).unwrap();
    assert_eq!(ctx.page_size(), Vec2::new(1080.0, 1080.0));
    assert!((ctx.zoom() - 720.0 / 1080.0).abs() < 1e-4);
    assert_eq!(CanvasPreset::matching(ctx.page_size()), Some(CanvasPreset::InstagramPost));
}

#[test]
fn test_canvas_size_is_validated() {
    let mut ctx = EditorContext::default();
    assert!(matches!(
        ctx.set_canvas_size(Vec2::new(10.0, 600.0)),
        Err(ValidationError::CanvasSizeOutOfRange { .. })
    ));
    assert!(ctx.set_canvas_size(Vec2::new(800.0, 5000.0)).is_err());
    assert_eq!(ctx.page_size(), Vec2::new(800.0, 600.0));

    ctx.set_canvas_size(Vec2::new(50.0, 4000.0)).unwrap();
    assert_eq!(ctx.page_size(), Vec2::new(50.0, 4000.0));
}

#[test]
fn test_shrinking_canvas_clamps_elements() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    ctx.set_canvas_size(Vec2::new(300.0, 300.0)).unwrap();
    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(199.0, 199.0));
}

#[test]
fn test_export_sees_live_canvas() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Circle);
    ctx.add_page();
    ctx.create_shape_element(ShapeVariant::Triangle);
    ctx.create_shape_element(ShapeVariant::Line);

    let pages = ctx.pages_for_export();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].elements.len(), 1);
    assert_eq!(pages[1].elements.len(), 2);
}
