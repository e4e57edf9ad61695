use eframe_design::element::ShapeVariant;
use eframe_design::geometry::Viewport;
use eframe_design::gesture::PointerTarget;
use eframe_design::{EditorContext, HistoryAction};
use egui::{Pos2, Vec2};

fn identity() -> Viewport {
    Viewport::new(Pos2::ZERO, 1.0)
}

fn drag(ctx: &mut EditorContext, from: Pos2, to: Pos2, viewport: &Viewport) {
    ctx.pointer_down(from, viewport);
    ctx.pointer_move(to, viewport);
    ctx.pointer_up();
}

#[test]
fn test_drag_text_then_undo() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Text", 16.0);
    ctx.end_text_edit();
    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(400.0, 300.0));

    drag(&mut ctx, Pos2::new(400.0, 300.0), Pos2::new(450.0, 330.0), &identity());

    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(450.0, 330.0));
    assert!(matches!(ctx.history().last(), Some(HistoryAction::Move { .. })));
    assert_eq!(ctx.history().undo_len(), 2);

    assert!(ctx.undo());
    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(400.0, 300.0));
    assert!(ctx.can_redo());
}

#[test]
fn test_press_inside_dead_zone_is_a_click() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);
    let start = ctx.element(id).unwrap().position;

    drag(&mut ctx, Pos2::new(400.0, 300.0), Pos2::new(403.0, 297.0), &identity());

    assert_eq!(ctx.element(id).unwrap().position, start);
    assert_eq!(ctx.history().undo_len(), 1);
    assert!(ctx.current_state().is_idle());
}

#[test]
fn test_drag_delta_is_divided_by_zoom() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);
    // page origin at (100, 50), zoom 2: the box 350..450 sits at 800..1000 on screen
    let viewport = Viewport::new(Pos2::new(100.0, 50.0), 2.0);

    drag(&mut ctx, Pos2::new(900.0, 650.0), Pos2::new(1000.0, 650.0), &viewport);

    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(400.0, 250.0));
}

#[test]
fn test_drag_is_clamped_to_page() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    drag(&mut ctx, Pos2::new(400.0, 300.0), Pos2::new(2000.0, 2000.0), &identity());
    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(699.0, 499.0));

    ctx.pointer_down(Pos2::new(749.0, 549.0), &identity());
    ctx.pointer_move(Pos2::new(-500.0, -500.0), &identity());
    ctx.pointer_up();
    assert_eq!(ctx.element(id).unwrap().position, Pos2::new(1.0, 1.0));
}

#[test]
fn test_circle_resize_keeps_aspect() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Circle);

    let target = ctx.pointer_down(Pos2::new(450.0, 350.0), &identity());
    assert!(matches!(target, PointerTarget::Handle(handle_id, _) if handle_id == id));
    assert!(ctx.current_state().is_resizing());

    ctx.pointer_move(Pos2::new(490.0, 360.0), &identity());
    ctx.pointer_up();

    let circle = ctx.element(id).unwrap();
    assert_eq!(circle.size.x, circle.size.y);
    assert_eq!(circle.size, Vec2::splat(140.0));
    assert_eq!(circle.position, Pos2::new(350.0, 250.0));
    assert!(matches!(ctx.history().last(), Some(HistoryAction::StyleUpdate { .. })));
}

#[test]
fn test_resize_respects_minimum_size() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    // top-left handle dragged past the opposite corner
    ctx.pointer_down(Pos2::new(350.0, 250.0), &identity());
    ctx.pointer_move(Pos2::new(600.0, 500.0), &identity());
    ctx.pointer_up();

    let rect = ctx.element(id).unwrap().rect();
    assert_eq!(rect.size(), Vec2::splat(20.0));
    assert_eq!(rect.max, Pos2::new(450.0, 350.0));
}

#[test]
fn test_line_resizes_horizontally_only() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Line);
    assert_eq!(ctx.element(id).unwrap().rect().right(), 500.0);

    ctx.pointer_down(Pos2::new(500.0, 300.0), &identity());
    ctx.pointer_move(Pos2::new(450.0, 340.0), &identity());
    ctx.pointer_up();
    let line = ctx.element(id).unwrap();
    assert_eq!(line.size, Vec2::new(150.0, 24.0));

    // lines never get shorter than their minimum length
    let right = line.rect().right();
    ctx.pointer_down(Pos2::new(right, 300.0), &identity());
    ctx.pointer_move(Pos2::new(0.0, 300.0), &identity());
    ctx.pointer_up();
    assert_eq!(ctx.element(id).unwrap().size.x, 100.0);
}

#[test]
fn test_rotate_handle_follows_pointer() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);

    // the rotation handle sits 30px above the top edge
    ctx.pointer_down(Pos2::new(400.0, 220.0), &identity());
    assert!(ctx.current_state().is_rotating());
    ctx.pointer_move(Pos2::new(500.0, 300.0), &identity());
    ctx.pointer_up();

    let rotation = ctx.element(id).unwrap().rotation;
    assert!((rotation - 90.0).abs() < 1e-3, "rotation was {rotation}");

    ctx.undo();
    assert_eq!(ctx.element(id).unwrap().rotation, 0.0);
}

#[test]
fn test_press_on_edited_text_starts_no_gesture() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_text_element("Editing", 24.0);
    assert_eq!(ctx.selection().editing(), Some(id));

    let target = ctx.pointer_down(Pos2::new(400.0, 300.0), &identity());
    assert_eq!(target, PointerTarget::Body(id));
    assert!(ctx.current_state().is_idle());
    assert_eq!(ctx.selection().editing(), Some(id));
}

#[test]
fn test_press_on_empty_canvas_deselects() {
    let mut ctx = EditorContext::default();
    ctx.create_shape_element(ShapeVariant::Triangle);
    assert!(ctx.selected_element().is_some());

    let target = ctx.pointer_down(Pos2::new(20.0, 20.0), &identity());
    ctx.pointer_up();

    assert_eq!(target, PointerTarget::Empty);
    assert!(ctx.selected_element().is_none());
}

#[test]
fn test_momentum_glide_is_not_recorded() {
    let mut ctx = EditorContext::default();
    let id = ctx.create_shape_element(ShapeVariant::Rectangle);
    drag(&mut ctx, Pos2::new(400.0, 300.0), Pos2::new(420.0, 300.0), &identity());
    let released = ctx.element(id).unwrap().position;
    let undo_len = ctx.history().undo_len();

    assert!(ctx.step_animation());
    assert!(ctx.element(id).unwrap().position.x > released.x);

    let mut frames = 0;
    while ctx.step_animation() {
        frames += 1;
        assert!(frames < 1000, "glide never stopped");
    }
    assert_eq!(ctx.history().undo_len(), undo_len);
    assert!(ctx.element(id).unwrap().position.x <= 699.0);
}
