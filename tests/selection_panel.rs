use eframe_design::element::{BorderStyle, MediaSource, MediaVariant, ShapeVariant};
use eframe_design::properties::PropertyEdit;
use eframe_design::selection::PanelKind;
use eframe_design::{EditorContext, Shortcut};
use egui::{Color32, Pos2, Vec2};

#[test]
fn test_panel_follows_selection() {
    let mut ctx = EditorContext::default();
    assert_eq!(ctx.panel(), PanelKind::NoSelection);
    assert_eq!(ctx.panel().title(), "No element selected");

    ctx.create_text_element("Body", 16.0);
    assert_eq!(ctx.panel(), PanelKind::Text);
    assert_eq!(ctx.panel().title(), "Text Properties");

    ctx.create_shape_element(ShapeVariant::Hexagon);
    assert_eq!(ctx.panel().title(), "Shape Properties");

    ctx.create_media_element(MediaVariant::Video, MediaSource::url("https://example.test/a.mp4"), None);
    assert_eq!(ctx.panel().title(), "Media Properties");

    ctx.deselect();
    assert_eq!(ctx.panel(), PanelKind::NoSelection);
    assert!(ctx.property_values().is_none());
}

#[test]
fn test_property_values_reflect_element() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);
    ctx.edit_selected(PropertyEdit::Opacity(40.0), false);
    ctx.edit_selected(PropertyEdit::Rotation(-30.0), false);

    let values = ctx.property_values().unwrap();
    assert_eq!(values.position, Pos2::new(350.0, 250.0));
    assert_eq!(values.opacity_percent, 40.0);
    assert_eq!(values.rotation, 330.0);
    let shape = values.shape.unwrap();
    assert_eq!(shape.fill, Color32::WHITE);
    assert_eq!(shape.border_width, 1.0);
    assert_eq!(shape.border_style, BorderStyle::Solid);
    assert!(values.text.is_none());
}

#[test]
fn test_text_edits_remeasure() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Text", 16.0);
    ctx.end_text_edit();
    let before = ctx.element(id).unwrap().size;

    assert!(ctx.edit_selected(PropertyEdit::FontSize(32.0), false));
    assert!(ctx.edit_selected(PropertyEdit::Bold(true), false));

    let text = ctx.element(id).unwrap();
    assert!(text.size.x > before.x);
    assert!(text.style_string().contains("font-weight: bold"));
    assert_eq!(text.position, Pos2::new(400.0, 300.0));
}

#[test]
fn test_line_fill_colours_stroke() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Line);

    ctx.edit_selected(PropertyEdit::Fill(Color32::RED), false);
    ctx.edit_selected(PropertyEdit::BorderWidth(6.0), false);
    assert!(!ctx.edit_selected(PropertyEdit::BorderStyle(BorderStyle::Dashed), false));

    let line = ctx.element(id).unwrap().as_shape().unwrap();
    assert_eq!(line.fill, Color32::RED);
    assert_eq!(line.stroke_width, 6.0);
}

#[test]
fn test_star_ignores_border_edits() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Star);
    assert!(!ctx.edit_selected(PropertyEdit::BorderWidth(4.0), false));
    assert!(!ctx.edit_selected(PropertyEdit::BorderColor(Color32::BLUE), false));
    assert!(ctx.edit_selected(PropertyEdit::Fill(Color32::YELLOW), false));
}

#[test]
fn test_position_edit_is_clamped() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);
    ctx.edit_selected(PropertyEdit::PositionX(5000.0), false);
    assert_eq!(ctx.element(id).unwrap().position.x, 699.0);
}

#[test]
fn test_z_order_commands() {
    let mut ctx = EditorContext::default();
    let bottom = ctx.create_shape_element(ShapeVariant::Rectangle);
    let top = ctx.create_shape_element(ShapeVariant::Circle);
    let z = |ctx: &EditorContext, id| ctx.element(id).unwrap().z_index;
    assert!(z(&ctx, top) > z(&ctx, bottom));

    ctx.select(bottom);
    ctx.bring_to_front();
    assert!(z(&ctx, bottom) > z(&ctx, top));
    assert_eq!(ctx.history().last().map(|a| a.label()), Some("update"));

    ctx.send_to_back();
    assert!(z(&ctx, bottom) <= z(&ctx, top));
    assert!(z(&ctx, bottom) >= 0);

    ctx.undo();
    assert!(z(&ctx, bottom) > z(&ctx, top));
}

#[test]
fn test_delete_selected() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Triangle);
    ctx.delete_selected().unwrap();
    assert!(ctx.element(id).is_none());
    assert_eq!(ctx.panel(), PanelKind::NoSelection);

    ctx.undo();
    assert!(ctx.element(id).is_some());
}

#[test]
fn test_text_being_edited_is_not_deleted() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Typing", 16.0);
    assert!(ctx.delete_selected().is_err());

    ctx.handle_shortcut(Shortcut::Delete);
    assert!(ctx.element(id).is_some());
}

#[test]
fn test_style_shortcuts_toggle_text() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Text", 16.0);
    ctx.end_text_edit();

    ctx.handle_shortcut(Shortcut::ToggleItalic);
    ctx.handle_shortcut(Shortcut::ToggleUnderline);
    let style = &ctx.element(id).unwrap().as_text().unwrap().style;
    assert!(style.italic);
    assert!(style.underline);

    ctx.handle_shortcut(Shortcut::Undo);
    assert!(!ctx.element(id).unwrap().as_text().unwrap().style.underline);
}

#[test]
fn test_video_controls_skip_history() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_media_element(MediaVariant::Video, MediaSource::url("https://example.test/a.mp4"), None);
    assert_eq!(ctx.element(id).unwrap().size, Vec2::new(500.0, 300.0));

    assert!(ctx.toggle_playback(id));
    ctx.set_volume(id, 0.33);
    let playback = ctx.element(id).unwrap().as_media().unwrap().playback;
    assert!(playback.playing);
    assert!((playback.volume - 0.3).abs() < 1e-6);
    assert_eq!(ctx.history().undo_len(), 1);
}

#[test]
fn test_background_image_defaults() {
    let mut ctx = EditorContext::default();
    ctx.set_background_image(MediaSource::url("https://example.test/bg.jpg"));
    assert!(ctx.background().has_image());
    assert_eq!(ctx.history().last().map(|a| a.label()), Some("background"));

    ctx.clear_background();
    assert!(!ctx.background().has_image());
    ctx.undo();
    assert!(ctx.background().has_image());
}
