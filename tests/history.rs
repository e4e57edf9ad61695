use eframe_design::element::{ElementId, ShapeVariant};
use eframe_design::geometry::Viewport;
use eframe_design::properties::PropertyEdit;
use eframe_design::{CommandHistory, EditorContext, HistoryAction, Shortcut};
use egui::{Color32, Pos2, Vec2};

fn move_action(x: f32) -> HistoryAction {
    HistoryAction::Move {
        id: ElementId::new(),
        old_position: Pos2::ZERO,
        new_position: Pos2::new(x, 0.0),
    }
}

fn new_x(action: Option<&HistoryAction>) -> Option<f32> {
    match action {
        Some(HistoryAction::Move { new_position, .. }) => Some(new_position.x),
        _ => None,
    }
}

fn is_bold(ctx: &EditorContext, id: ElementId) -> bool {
    ctx.element(id).unwrap().as_text().unwrap().style.bold
}

#[test]
fn test_history_evicts_oldest_past_capacity() {
    let mut history = CommandHistory::new(50);
    for i in 0..51 {
        history.push(move_action(i as f32));
    }
    assert_eq!(history.undo_len(), 50);
    assert_eq!(new_x(history.last()), Some(50.0));
}

#[test]
fn test_push_clears_redo() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);
    ctx.create_shape_element(ShapeVariant::Circle);
    assert!(ctx.undo());
    assert_eq!(ctx.history().redo_len(), 1);

    ctx.create_shape_element(ShapeVariant::Star);
    assert_eq!(ctx.history().redo_len(), 0);
    assert!(!ctx.can_redo());
}

#[test]
fn test_undo_then_redo_restores_state() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Hexagon);
    ctx.edit_selected(PropertyEdit::Rotation(45.0), false);
    let edited = ctx.element(id).cloned();

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().rotation, 0.0);
    assert!(ctx.redo());
    assert_eq!(ctx.element(id).cloned(), edited);

    // undoing the add removes the element and its selection
    assert!(ctx.undo());
    assert!(ctx.undo());
    assert!(ctx.element(id).is_none());
    assert!(ctx.selected_element().is_none());
    assert!(!ctx.undo());
}

#[test]
fn test_slider_drag_coalesces() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    ctx.edit_selected(PropertyEdit::Opacity(90.0), false);
    ctx.edit_selected(PropertyEdit::Opacity(80.0), true);
    ctx.edit_selected(PropertyEdit::Opacity(70.0), true);

    // add + one update
    assert_eq!(ctx.history().undo_len(), 2);
    assert!((ctx.element(id).unwrap().opacity - 0.7).abs() < 1e-6);

    ctx.undo();
    assert_eq!(ctx.element(id).unwrap().opacity, 1.0);
}

#[test]
fn test_separate_edits_stay_separate() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);

    ctx.edit_selected(PropertyEdit::Opacity(90.0), false);
    ctx.edit_selected(PropertyEdit::Rotation(30.0), false);
    assert_eq!(ctx.history().undo_len(), 3);
    assert_eq!(ctx.history().last().map(|a| a.label()), Some("update"));
}

#[test]
fn test_noop_edit_is_not_recorded() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Rectangle);

    assert!(!ctx.edit_selected(PropertyEdit::Opacity(100.0), false));
    // text styling does not apply to shapes
    assert!(!ctx.edit_selected(PropertyEdit::Bold(true), false));
    assert_eq!(ctx.history().undo_len(), 1);
}

#[test]
fn test_text_edit_commits_one_entry() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Add a heading", 32.0);
    ctx.set_text_content("Summer sale");
    ctx.set_text_content("Summer sale!");
    ctx.end_text_edit();

    assert_eq!(ctx.history().undo_len(), 2);
    ctx.undo();
    assert_eq!(ctx.element(id).unwrap().content(), "Add a heading");
}

#[test]
fn test_blank_text_is_removed_on_commit() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Body", 16.0);
    ctx.set_text_content("   ");
    ctx.end_text_edit();

    assert!(ctx.element(id).is_none());
    assert_eq!(ctx.history().last().map(|a| a.label()), Some("remove"));

    ctx.undo();
    assert_eq!(ctx.element(id).unwrap().content(), "Body");
}

#[test]
fn test_style_edit_during_typing_gets_own_entry() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Hi", 16.0);
    ctx.end_text_edit();
    let before = ctx.history().undo_len();

    ctx.begin_text_edit(id).unwrap();
    ctx.set_text_content("Hello");
    assert!(ctx.edit_selected(PropertyEdit::Bold(true), false));
    ctx.end_text_edit();

    // typing, then bold
    assert_eq!(ctx.history().undo_len(), before + 2);

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().content(), "Hello");
    assert!(!is_bold(&ctx, id));

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().content(), "Hi");
    assert!(!is_bold(&ctx, id));

    assert!(ctx.redo());
    assert!(ctx.redo());
    assert_eq!(ctx.element(id).unwrap().content(), "Hello");
    assert!(is_bold(&ctx, id));
}

#[test]
fn test_shortcut_while_typing_without_changes() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Body", 16.0);

    ctx.handle_shortcut(Shortcut::ToggleItalic);
    ctx.end_text_edit();

    // add + italic, nothing typed
    assert_eq!(ctx.history().undo_len(), 2);
    assert!(ctx.undo());
    assert!(!ctx.element(id).unwrap().as_text().unwrap().style.italic);
    assert_eq!(ctx.element(id).unwrap().content(), "Body");
}

#[test]
fn test_resize_during_typing_gets_own_entry() {
    let mut ctx = EditorContext::default();
    let viewport = Viewport::new(Pos2::ZERO, 1.0);
    let id = ctx.create_text_element("Hi", 16.0);
    ctx.end_text_edit();
    let before = ctx.history().undo_len();

    ctx.begin_text_edit(id).unwrap();
    ctx.set_text_content("Hello");
    let typed = ctx.element(id).cloned().unwrap();

    let corner = typed.rect().max;
    ctx.pointer_down(corner, &viewport);
    ctx.pointer_move(corner + Vec2::new(40.0, 20.0), &viewport);
    ctx.pointer_up();
    let resized = ctx.element(id).cloned().unwrap();
    assert_ne!(resized.size, typed.size);

    ctx.end_text_edit();
    assert_eq!(ctx.history().undo_len(), before + 2);

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).cloned().unwrap(), typed);
    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().content(), "Hi");
}

#[test]
fn test_colour_does_not_merge_into_other_property() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    ctx.edit_selected(PropertyEdit::Opacity(50.0), false);
    ctx.edit_selected(PropertyEdit::Fill(Color32::RED), true);
    assert_eq!(ctx.history().undo_len(), 3);

    assert!(ctx.undo());
    let rect = ctx.element(id).unwrap();
    assert_eq!(rect.as_shape().unwrap().fill, Color32::WHITE);
    assert!((rect.opacity - 0.5).abs() < 1e-6);

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().opacity, 1.0);
}

#[test]
fn test_colour_picker_run_ends_when_sealed() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Circle);

    ctx.edit_selected(PropertyEdit::Fill(Color32::RED), false);
    ctx.edit_selected(PropertyEdit::Fill(Color32::GREEN), true);
    ctx.edit_selected(PropertyEdit::Fill(Color32::BLUE), true);
    assert_eq!(ctx.history().undo_len(), 2);

    // a second, separate picker interaction
    ctx.seal_history();
    ctx.edit_selected(PropertyEdit::Fill(Color32::YELLOW), true);
    assert_eq!(ctx.history().undo_len(), 3);

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().as_shape().unwrap().fill, Color32::BLUE);
    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().as_shape().unwrap().fill, Color32::WHITE);
}

#[test]
fn test_background_picker_drag_is_one_entry() {
    let mut ctx = EditorContext::default();

    ctx.set_background_color(Color32::from_rgb(250, 0, 0), false);
    for step in 1..=80u8 {
        ctx.set_background_color(Color32::from_rgb(250, step, 0), true);
    }
    assert_eq!(ctx.history().undo_len(), 1);
    assert_eq!(ctx.background().color, Color32::from_rgb(250, 80, 0));

    assert!(ctx.undo());
    assert_eq!(ctx.background().color, Color32::WHITE);
    assert!(!ctx.can_undo());
}

#[test]
fn test_background_colour_does_not_merge_into_image_change() {
    let mut ctx = EditorContext::default();
    ctx.set_background_image(eframe_design::element::MediaSource::url("https://example.test/bg.jpg"));
    ctx.set_background_color(Color32::BLACK, true);
    assert_eq!(ctx.history().undo_len(), 2);

    assert!(ctx.undo());
    assert!(ctx.background().has_image());
    assert_eq!(ctx.background().color, Color32::WHITE);
}
