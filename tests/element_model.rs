use eframe_design::element::{
    self, Anchor, Element, ElementKind, MediaSource, MediaVariant, ShapeVariant, color_from_hex, color_to_hex,
};
use egui::{Color32, Pos2, Rect, Vec2};

const PAGE: Vec2 = Vec2::new(800.0, 600.0);

fn create_test_text() -> Element {
    element::factory::create_text("Heading", 32.0, PAGE)
}

fn create_test_shape(variant: ShapeVariant) -> Element {
    element::factory::create_shape(variant, PAGE)
}

#[test]
fn test_element_creation() {
    let text = create_test_text();
    assert_eq!(text.kind(), ElementKind::Text);
    assert_eq!(text.element_type(), "text");
    assert_eq!(text.content(), "Heading");

    let shape = create_test_shape(ShapeVariant::Rectangle);
    assert_eq!(shape.element_type(), "shape");
    assert_eq!(shape.content(), "");

    let image = element::factory::create_media(
        MediaVariant::Image,
        MediaSource::url("https://example.test/cat.png"),
        Some(Vec2::new(1000.0, 500.0)),
        PAGE,
    );
    assert_eq!(image.element_type(), "media");
    assert_eq!(image.content(), "https://example.test/cat.png");
}

#[test]
fn test_ids_are_unique() {
    let a = create_test_text();
    let b = create_test_text();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_text_is_center_anchored() {
    let text = create_test_text();
    assert_eq!(text.anchor(), Anchor::Center);
    assert_eq!(text.position, Pos2::new(400.0, 300.0));
    assert_eq!(text.rect().center(), Pos2::new(400.0, 300.0));
}

#[test]
fn test_shapes_are_top_left_anchored() {
    let shape = create_test_shape(ShapeVariant::Rectangle);
    assert_eq!(shape.anchor(), Anchor::TopLeft);
    assert_eq!(shape.rect(), Rect::from_min_size(Pos2::new(350.0, 250.0), Vec2::new(100.0, 100.0)));
}

#[test]
fn test_set_rect_respects_anchor() {
    let target = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(60.0, 40.0));

    let mut text = create_test_text();
    text.set_rect(target);
    assert_eq!(text.position, Pos2::new(40.0, 40.0));
    assert_eq!(text.rect(), target);

    let mut shape = create_test_shape(ShapeVariant::Triangle);
    shape.set_rect(target);
    assert_eq!(shape.position, Pos2::new(10.0, 20.0));
    assert_eq!(shape.rect(), target);
}

#[test]
fn test_rotation_is_normalized() {
    let mut shape = create_test_shape(ShapeVariant::Star);
    shape.set_rotation(-90.0);
    assert_eq!(shape.rotation, 270.0);
    shape.set_rotation(720.0);
    assert_eq!(shape.rotation, 0.0);
}

#[test]
fn test_hit_test_follows_rotation() {
    let mut shape = create_test_shape(ShapeVariant::Rectangle);
    shape.size = Vec2::new(200.0, 20.0);
    shape.position = Pos2::new(300.0, 290.0);
    // horizontal bar centred on (400, 300)
    assert!(shape.hit_test(Pos2::new(490.0, 300.0)));
    assert!(!shape.hit_test(Pos2::new(400.0, 380.0)));

    shape.set_rotation(90.0);
    assert!(!shape.hit_test(Pos2::new(490.0, 300.0)));
    assert!(shape.hit_test(Pos2::new(400.0, 380.0)));
}

#[test]
fn test_lines_only_hit_near_stroke() {
    let line = create_test_shape(ShapeVariant::Line);
    let rect = line.rect();
    assert!(line.hit_test(rect.center()));
    assert!(!line.hit_test(Pos2::new(rect.center().x, rect.bottom() + 20.0)));
}

#[test]
fn test_default_shape_styles() {
    let arrow = create_test_shape(ShapeVariant::Arrow);
    let shape = arrow.as_shape().unwrap();
    assert_eq!(shape.fill, Color32::BLACK);
    assert!(!shape.border.is_visible());
    assert!(arrow.style_string().contains("stroke: #000000"));

    let circle = create_test_shape(ShapeVariant::Circle);
    assert!(circle.style_string().contains("border-radius: 50%"));
}

#[test]
fn test_arrow_head_keeps_its_size() {
    let arrow = create_test_shape(ShapeVariant::Arrow);
    let shape = arrow.as_shape().unwrap();
    for width in [120.0, 400.0] {
        let size = Vec2::new(width, 24.0);
        let (_, end) = shape.line_segment(size, 30.0).unwrap();
        let head = shape.arrow_head(size, 30.0).unwrap();
        assert_eq!(end.x, width - 30.0);
        assert_eq!(head[1].x - head[0].x, 30.0);
    }
}

#[test]
fn test_images_fit_insertion_box() {
    let image = element::factory::create_media(
        MediaVariant::Image,
        MediaSource::inline("image/png", vec![0; 4]),
        Some(Vec2::new(2000.0, 1000.0)),
        PAGE,
    );
    assert_eq!(image.size, Vec2::new(500.0, 250.0));

    let small = element::factory::create_media(
        MediaVariant::Image,
        MediaSource::inline("image/png", vec![0; 4]),
        Some(Vec2::new(120.0, 80.0)),
        PAGE,
    );
    assert_eq!(small.size, Vec2::new(120.0, 80.0));
}

#[test]
fn test_volume_steps() {
    let mut video = element::factory::create_media(
        MediaVariant::Video,
        MediaSource::url("https://example.test/clip.mp4"),
        None,
        PAGE,
    );
    let media = video.as_media_mut().unwrap();
    media.set_volume(0.46);
    assert_eq!(media.playback.volume, 0.5);
    media.set_volume(3.0);
    assert_eq!(media.playback.volume, 1.0);
}

#[test]
fn test_hex_colors() {
    assert_eq!(color_to_hex(Color32::from_rgb(255, 0, 128)), "#ff0080");
    assert_eq!(color_from_hex("#f00"), Some(Color32::from_rgb(255, 0, 0)));
    assert_eq!(color_from_hex("#00ff00"), Some(Color32::from_rgb(0, 255, 0)));
    assert_eq!(color_from_hex("transparent"), Some(Color32::TRANSPARENT));
    assert_eq!(color_from_hex("red"), None);
}
