use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke, Ui, Vec2};
use egui::text::{LayoutJob, TextFormat};

use crate::canvas::Interactivity;
use crate::element::{
    BorderStyle, Element, ElementBody, MediaElement, MediaSource, MediaVariant, ShapeElement, ShapeVariant,
    TextAlign, TextElement, rotate_point,
};
use crate::export::ImageResolver;
use crate::export::raster::background_draw_size;
use crate::geometry::Viewport;
use crate::geometry::hit_testing::handle_points;
use crate::page::{Background, BackgroundRepeat};
use crate::state::EditorContext;
use crate::texture_manager::{TextureGenerationError, TextureManager, TextureOwner, source_version};
use crate::widgets::resize_handle::{Handle, ResizeHandle};

const SELECTION_COLOR: Color32 = Color32::from_rgb(30, 120, 255);
const HANDLE_SIZE: f32 = 8.0;
const PAGE_SHADOW: Color32 = Color32::from_black_alpha(40);

/// Paints the live page with egui shapes.
///
/// Images are decoded from inline data only; remote sources show a
/// placeholder on screen and are fetched at export time.
pub struct CanvasRenderer {
    textures: TextureManager,
    resolver: ImageResolver,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer").field("textures", &self.textures).finish()
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(64),
            resolver: ImageResolver::offline(),
        }
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Paint the page, every element in z-order, and the selection chrome
    pub fn render(&mut self, ui: &mut Ui, editor: &EditorContext, viewport: Viewport) {
        self.textures.begin_frame();
        let page_rect = Rect::from_min_size(viewport.origin, editor.page_size() * viewport.zoom);
        let painter = ui.painter_at(ui.max_rect());

        painter.rect_filled(page_rect.translate(Vec2::splat(4.0)), 0.0, PAGE_SHADOW);
        self.paint_background(&painter, page_rect, viewport.zoom, editor.background());

        let page_painter = painter.with_clip_rect(page_rect);
        let reservation = editor.config().gestures.arrow_head_reservation;
        for element in editor.canvas().draw_order() {
            let editing = editor.selection().editing() == Some(element.id);
            self.paint_element(&page_painter, element, viewport, reservation, editing);
        }

        if let Some(element) = editor.selected_element() {
            if let Some(binding) = editor.canvas().binding(element.id) {
                let offset = editor.config().gestures.rotate_handle_offset / viewport.zoom;
                paint_selection(ui, element, binding, viewport, offset);
            }
        }
    }

    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        owner: TextureOwner,
        source: &MediaSource,
    ) -> Option<(egui::TextureId, Vec2)> {
        let resolver = &self.resolver;
        let generator = || {
            let image = futures::executor::block_on(resolver.resolve(source))
                .map_err(|e| TextureGenerationError::Decode(e.to_string()))?;
            let size = [image.width() as usize, image.height() as usize];
            Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
        };
        match self.textures.get_or_create_texture(owner, source_version(source), generator, ctx) {
            Ok(texture) => Some(texture),
            Err(err) => {
                log::trace!("no texture for {}: {}", source.describe(), err);
                None
            }
        }
    }

    fn paint_background(&mut self, painter: &egui::Painter, page_rect: Rect, zoom: f32, background: &Background) {
        painter.rect_filled(page_rect, 0.0, background.color);
        let Some(source) = &background.image else {
            return;
        };
        let Some((texture, image_size)) = self.texture_for(painter.ctx(), TextureOwner::Background, source) else {
            return;
        };

        let page_size = page_rect.size();
        let drawn = background_draw_size(image_size * zoom, page_size, background.size);
        let (fx, fy) = background.position.factors();
        let origin = page_rect.min + Vec2::new((page_size.x - drawn.x) * fx, (page_size.y - drawn.y) * fy);

        let clipped = painter.with_clip_rect(page_rect);
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let mut tiles = vec![Rect::from_min_size(origin, drawn)];
        if background.repeat == BackgroundRepeat::Repeat && drawn.x >= 1.0 && drawn.y >= 1.0 {
            tiles.clear();
            let mut y = origin.y - ((origin.y - page_rect.top()) / drawn.y).ceil() * drawn.y;
            while y < page_rect.bottom() {
                let mut x = origin.x - ((origin.x - page_rect.left()) / drawn.x).ceil() * drawn.x;
                while x < page_rect.right() {
                    tiles.push(Rect::from_min_size(Pos2::new(x, y), drawn));
                    x += drawn.x;
                }
                y += drawn.y;
            }
        }
        for tile in tiles {
            clipped.image(texture, tile, uv, Color32::WHITE);
        }
    }

    fn paint_element(
        &mut self,
        painter: &egui::Painter,
        element: &Element,
        viewport: Viewport,
        arrow_head_reservation: f32,
        editing: bool,
    ) {
        let frame = ElementFrame::new(element, viewport);
        match &element.body {
            ElementBody::Text(text) => {
                // The edit overlay draws the text itself while typing
                if !editing {
                    paint_text(painter, text, &frame);
                }
            }
            ElementBody::Shape(shape) => paint_shape(painter, shape, &frame, arrow_head_reservation),
            ElementBody::Media(media) => self.paint_media(painter, element, media, &frame),
        }
    }

    fn paint_media(&mut self, painter: &egui::Painter, element: &Element, media: &MediaElement, frame: &ElementFrame) {
        let corners = frame.corners();
        match media.variant {
            MediaVariant::Image => {
                match self.texture_for(painter.ctx(), TextureOwner::Element(element.id), &media.source) {
                    Some((texture, _)) => {
                        let mut mesh = egui::Mesh::with_texture(texture);
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        mesh.add_rect_with_uv(frame.screen_rect, uv, frame.fade(Color32::WHITE));
                        for vertex in &mut mesh.vertices {
                            vertex.pos = rotate_point(vertex.pos, frame.center, frame.rotation);
                        }
                        painter.add(Shape::mesh(mesh));
                    }
                    None => {
                        painter.add(Shape::convex_polygon(
                            corners.to_vec(),
                            frame.fade(Color32::from_gray(220)),
                            Stroke::new(1.0, frame.fade(Color32::GRAY)),
                        ));
                        painter.text(
                            frame.center,
                            egui::Align2::CENTER_CENTER,
                            "🖼",
                            egui::FontId::proportional(24.0),
                            frame.fade(Color32::DARK_GRAY),
                        );
                    }
                }
            }
            MediaVariant::Video => {
                painter.add(Shape::convex_polygon(corners.to_vec(), frame.fade(Color32::BLACK), Stroke::NONE));
                let icon = if media.playback.playing { "⏸" } else { "▶" };
                painter.text(
                    frame.center,
                    egui::Align2::CENTER_CENTER,
                    icon,
                    egui::FontId::proportional(32.0 * frame.zoom),
                    frame.fade(Color32::WHITE),
                );
                let volume_pos = rotate_point(
                    frame.screen_rect.left_bottom() + Vec2::new(8.0, -8.0),
                    frame.center,
                    frame.rotation,
                );
                painter.text(
                    volume_pos,
                    egui::Align2::LEFT_BOTTOM,
                    format!("🔊 {:.0}%", media.playback.volume * 100.0),
                    egui::FontId::proportional(12.0),
                    frame.fade(Color32::LIGHT_GRAY),
                );
            }
        }
    }
}

/// An element's box in screen space plus the rotation to apply to it
struct ElementFrame {
    screen_rect: Rect,
    center: Pos2,
    rotation: f32,
    zoom: f32,
    opacity: f32,
}

impl ElementFrame {
    fn new(element: &Element, viewport: Viewport) -> Self {
        let screen_rect = viewport.page_rect_to_screen(element.rect());
        Self {
            screen_rect,
            center: screen_rect.center(),
            rotation: element.rotation,
            zoom: viewport.zoom,
            opacity: element.opacity.clamp(0.0, 1.0),
        }
    }

    /// Element-local page coordinates to rotated screen coordinates
    fn local(&self, p: Pos2) -> Pos2 {
        rotate_point(self.screen_rect.min + p.to_vec2() * self.zoom, self.center, self.rotation)
    }

    fn corners(&self) -> [Pos2; 4] {
        let r = self.screen_rect;
        [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom()]
            .map(|p| rotate_point(p, self.center, self.rotation))
    }

    fn fade(&self, color: Color32) -> Color32 {
        color.gamma_multiply(self.opacity)
    }
}

fn paint_text(painter: &egui::Painter, text: &TextElement, frame: &ElementFrame) {
    let style = &text.style;
    let family = if style.font_family.to_lowercase().contains("mono") {
        egui::FontFamily::Monospace
    } else {
        egui::FontFamily::Proportional
    };
    let color = frame.fade(style.color);
    let format = TextFormat {
        font_id: egui::FontId::new(style.font_size * frame.zoom, family),
        color,
        italics: style.italic,
        underline: if style.underline {
            Stroke::new((frame.zoom).max(1.0), color)
        } else {
            Stroke::NONE
        },
        line_height: Some(style.font_size * style.line_height * frame.zoom),
        ..Default::default()
    };
    let mut job = LayoutJob::single_section(text.content.clone(), format);
    job.halign = match style.align {
        TextAlign::Left | TextAlign::Justify => egui::Align::LEFT,
        TextAlign::Center => egui::Align::Center,
        TextAlign::Right => egui::Align::RIGHT,
    };
    let galley = painter.layout_job(job);

    let text_pos = frame.center - galley.rect.center().to_vec2();
    let mut shape = Shape::galley(text_pos, galley.clone(), color);
    if let Shape::Text(text_shape) = &mut shape {
        text_shape.pos = rotate_point(text_pos, frame.center, frame.rotation);
        text_shape.angle = frame.rotation.to_radians();
    }
    painter.add(shape);

    // Faux bold: a second pass nudged by a fraction of a pixel
    if style.bold {
        let nudged = text_pos + Vec2::new(0.6 * frame.zoom.max(1.0), 0.0);
        let mut bold = Shape::galley(nudged, galley, color);
        if let Shape::Text(text_shape) = &mut bold {
            text_shape.pos = rotate_point(nudged, frame.center, frame.rotation);
            text_shape.angle = frame.rotation.to_radians();
        }
        painter.add(bold);
    }
}

fn paint_shape(painter: &egui::Painter, shape: &ShapeElement, frame: &ElementFrame, reservation: f32) {
    let size = frame.screen_rect.size() / frame.zoom;

    if shape.variant.is_linear() {
        let stroke = Stroke::new(shape.stroke_width * frame.zoom, frame.fade(shape.fill));
        if let Some((a, b)) = shape.line_segment(size, reservation) {
            painter.line_segment([frame.local(a), frame.local(b)], stroke);
        }
        if let Some(head) = shape.arrow_head(size, reservation) {
            let points = head.iter().map(|p| frame.local(*p)).collect();
            painter.add(Shape::convex_polygon(points, frame.fade(shape.fill), Stroke::NONE));
        }
        return;
    }

    let outline: Vec<Pos2> = match shape.variant {
        ShapeVariant::Circle => {
            let (rx, ry) = (size.x / 2.0, size.y / 2.0);
            (0..64)
                .map(|i| {
                    let t = i as f32 / 64.0 * std::f32::consts::TAU;
                    frame.local(Pos2::new(rx + rx * t.cos(), ry + ry * t.sin()))
                })
                .collect()
        }
        _ => match shape.polygon(size) {
            Some(points) => points.iter().map(|p| frame.local(*p)).collect(),
            None => frame.corners().to_vec(),
        },
    };

    let fill = frame.fade(shape.fill);
    if shape.variant == ShapeVariant::Star {
        // Concave: fan out from the center so every piece is convex
        for i in 0..outline.len() {
            let next = outline[(i + 1) % outline.len()];
            painter.add(Shape::convex_polygon(vec![frame.center, outline[i], next], fill, Stroke::NONE));
        }
    } else {
        painter.add(Shape::convex_polygon(outline.clone(), fill, Stroke::NONE));
    }

    let border = &shape.border;
    if !shape.variant.accepts_border() || !border.is_visible() {
        return;
    }
    let stroke = Stroke::new(border.width * frame.zoom, frame.fade(border.color));
    let mut closed = outline;
    if let Some(first) = closed.first().copied() {
        closed.push(first);
    }
    match border.style {
        BorderStyle::None => {}
        BorderStyle::Solid | BorderStyle::Double => {
            painter.add(Shape::line(closed, stroke));
        }
        BorderStyle::Dashed => {
            painter.extend(Shape::dashed_line(&closed, stroke, 3.0 * stroke.width, 2.0 * stroke.width));
        }
        BorderStyle::Dotted => {
            painter.extend(Shape::dotted_line(&closed, stroke.color, 2.0 * stroke.width, stroke.width / 2.0));
        }
    }
}

fn paint_selection(ui: &mut Ui, element: &Element, binding: &Interactivity, viewport: Viewport, rotate_offset: f32) {
    let frame = ElementFrame::new(element, viewport);
    let mut outline = frame.corners().to_vec();
    outline.push(outline[0]);
    ui.painter().add(Shape::dashed_line(&outline, Stroke::new(1.0, SELECTION_COLOR), 4.0, 3.0));

    let points = handle_points(element, &binding.resize_handles, binding.rotatable, rotate_offset);
    for (handle, page_pos) in points {
        let screen = viewport.page_to_screen(page_pos);
        if handle == Handle::Rotate {
            let top_mid = rotate_point(frame.screen_rect.center_top(), frame.center, frame.rotation);
            ui.painter().line_segment([top_mid, screen], Stroke::new(1.0, SELECTION_COLOR));
        }
        ResizeHandle::new(element.id, handle, screen, HANDLE_SIZE).show(ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let mut editor = EditorContext::new(EditorConfig::default());
        let id = editor.create_shape_element(ShapeVariant::Star);
        editor.select(id);
        let mut renderer = CanvasRenderer::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                renderer.render(ui, &editor, Viewport::new(Pos2::new(10.0, 10.0), 0.5));
            });
        });
    }

    #[test]
    fn frame_rotates_local_points() {
        let mut element = crate::element::factory::create_shape(ShapeVariant::Rectangle, Vec2::new(400.0, 400.0));
        element.position = Pos2::new(0.0, 0.0);
        element.size = Vec2::new(100.0, 100.0);
        element.rotation = 180.0;
        let frame = ElementFrame::new(&element, Viewport::new(Pos2::ZERO, 2.0));
        let p = frame.local(Pos2::new(0.0, 0.0));
        assert!((p.x - 200.0).abs() < 1e-3 && (p.y - 200.0).abs() < 1e-3);
    }
}
