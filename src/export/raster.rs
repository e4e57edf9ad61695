//! Flattening a page into a single pixel surface.
//!
//! Each element is drawn onto its own surface of the element's size and then
//! composited onto the page with its rotation applied about its center.
//! Anything that cannot be drawn is logged and skipped.

use std::collections::HashMap;

use egui::{Color32, Vec2};
use image::RgbaImage;
use rusttype::{Scale, point as rt_point};
use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, StrokeDash, Transform,
};

use super::fonts::FontBook;
use super::resolve::{DecodedImage, ImageResolver};
use super::{ExportError, ExportResult};
use crate::config::GestureConfig;
use crate::element::{
    BorderStyle, Element, ElementBody, ElementId, MediaElement, MediaVariant, ShapeElement,
    ShapeVariant, TEXT_PADDING, TextAlign, TextElement,
};
use crate::page::{Background, BackgroundRepeat, BackgroundSize, Page};

/// Decoded pictures a page needs, looked up before drawing
#[derive(Debug, Clone, Default)]
pub struct PageImages {
    pub background: Option<DecodedImage>,
    pub media: HashMap<ElementId, DecodedImage>,
}

impl PageImages {
    /// Resolve the background image and every image element of `page`.
    /// Failures are logged and leave the entry out.
    pub async fn resolve(page: &Page, resolver: &ImageResolver) -> Self {
        let mut images = PageImages::default();

        if let Some(source) = &page.background.image {
            match resolver.resolve(source).await {
                Ok(image) => images.background = Some(image),
                Err(e) => log::warn!("Skipping background of '{}': {}", page.name, e),
            }
        }

        for element in &page.elements {
            let Some(media) = element.as_media() else {
                continue;
            };
            if media.variant != MediaVariant::Image {
                continue;
            }
            match resolver.resolve(&media.source).await {
                Ok(image) => {
                    images.media.insert(element.id, image);
                }
                Err(e) => log::warn!("Skipping image {}: {}", element.id, e),
            }
        }

        images
    }
}

/// Everything the rasterizer reads for one page
pub struct RasterInput<'a> {
    pub size: Vec2,
    pub background: &'a Background,
    pub elements: Vec<&'a Element>,
    pub images: &'a PageImages,
    pub fonts: Option<&'a FontBook>,
    pub arrow_head_reservation: f32,
}

impl<'a> RasterInput<'a> {
    /// Input for a stored page, elements in paint order
    pub fn for_page(page: &'a Page, size: Vec2, images: &'a PageImages) -> Self {
        let mut elements: Vec<(usize, &Element)> = page.elements.iter().enumerate().collect();
        elements.sort_by_key(|(index, e)| (e.z_index, *index));
        Self {
            size,
            background: &page.background,
            elements: elements.into_iter().map(|(_, e)| e).collect(),
            images,
            fonts: Some(FontBook::system()),
            arrow_head_reservation: GestureConfig::default().arrow_head_reservation,
        }
    }
}

pub(crate) fn skia_color(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::from_rgba8(r, g, b, a)
}

fn surface_size(size: Vec2) -> (u32, u32) {
    (size.x.ceil().max(1.0) as u32, size.y.ceil().max(1.0) as u32)
}

/// Render a page. The surface is exactly the page's pixel size and starts white.
pub fn render_page(input: &RasterInput<'_>) -> ExportResult<Pixmap> {
    let (width, height) = surface_size(input.size);
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
    pixmap.fill(Color::WHITE);

    if input.background.color != Color32::WHITE {
        pixmap.fill(skia_color(input.background.color));
    }
    if let Some(image) = &input.images.background {
        if let Err(e) = draw_background_image(&mut pixmap, image, input.background) {
            log::warn!("Skipping background image: {}", e);
        }
    }

    for element in &input.elements {
        if let Err(e) = draw_element(&mut pixmap, element, input) {
            log::warn!("Skipping element {}: {}", element.id, e);
        }
    }

    Ok(pixmap)
}

/// Convert RGBA pixels to a premultiplied pixmap
pub fn pixmap_from_image(image: &RgbaImage) -> ExportResult<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(ExportError::Allocation { width, height })?;
    let mut data = image.as_raw().clone();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for channel in &mut px[..3] {
            *channel = (*channel as u16 * a / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size).ok_or(ExportError::Allocation { width, height })
}

/// Convert a premultiplied pixmap back to straight RGBA
pub fn image_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, data).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Size of the background image on the page for the given fit mode
pub fn background_draw_size(image: Vec2, page: Vec2, mode: BackgroundSize) -> Vec2 {
    match mode {
        BackgroundSize::Auto => image,
        BackgroundSize::Stretch => page,
        BackgroundSize::Cover => image * (page.x / image.x).max(page.y / image.y),
        BackgroundSize::Contain => image * (page.x / image.x).min(page.y / image.y),
    }
}

fn draw_background_image(pixmap: &mut Pixmap, image: &RgbaImage, background: &Background) -> ExportResult<()> {
    let source = pixmap_from_image(image)?;
    let image_size = Vec2::new(source.width() as f32, source.height() as f32);
    let page = Vec2::new(pixmap.width() as f32, pixmap.height() as f32);
    let drawn = background_draw_size(image_size, page, background.size);
    let (fx, fy) = background.position.factors();
    let origin = Vec2::new((page.x - drawn.x) * fx, (page.y - drawn.y) * fy);

    let mut offsets = vec![origin];
    if background.repeat == BackgroundRepeat::Repeat && drawn.x >= 1.0 && drawn.y >= 1.0 {
        offsets.clear();
        let start_x = origin.x - (origin.x / drawn.x).ceil() * drawn.x;
        let start_y = origin.y - (origin.y / drawn.y).ceil() * drawn.y;
        let mut y = start_y;
        while y < page.y {
            let mut x = start_x;
            while x < page.x {
                offsets.push(Vec2::new(x, y));
                x += drawn.x;
            }
            y += drawn.y;
        }
    }

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    for offset in offsets {
        let transform = Transform::from_translate(offset.x, offset.y)
            .pre_scale(drawn.x / image_size.x, drawn.y / image_size.y);
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }
    Ok(())
}

fn draw_element(pixmap: &mut Pixmap, element: &Element, input: &RasterInput<'_>) -> ExportResult<()> {
    let rect = element.rect();
    let center = rect.center();

    let (surface, scale) = match &element.body {
        ElementBody::Media(media) => match media_surface(element, media, input.images)? {
            Some(surface) => surface,
            None => return Ok(()),
        },
        ElementBody::Shape(shape) => (shape_surface(shape, element.size, input.arrow_head_reservation)?, Vec2::splat(1.0)),
        ElementBody::Text(text) => match input.fonts {
            Some(fonts) => (text_surface(text, element.size, fonts)?, Vec2::splat(1.0)),
            None => return Ok(()),
        },
    };

    let transform = Transform::from_rotate_at(element.rotation, center.x, center.y)
        .pre_translate(rect.min.x, rect.min.y)
        .pre_scale(scale.x, scale.y);
    let paint = PixmapPaint {
        opacity: element.opacity.clamp(0.0, 1.0),
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, surface.as_ref(), &paint, transform, None);
    Ok(())
}

/// Image elements draw their decoded bitmap scaled to the box; videos draw a black frame
fn media_surface(
    element: &Element,
    media: &MediaElement,
    images: &PageImages,
) -> ExportResult<Option<(Pixmap, Vec2)>> {
    match media.variant {
        MediaVariant::Image => {
            let Some(image) = images.media.get(&element.id) else {
                return Ok(None);
            };
            let surface = pixmap_from_image(image)?;
            let scale = Vec2::new(
                element.size.x / surface.width() as f32,
                element.size.y / surface.height() as f32,
            );
            Ok(Some((surface, scale)))
        }
        MediaVariant::Video => {
            let (width, height) = surface_size(element.size);
            let mut surface = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
            surface.fill(Color::BLACK);
            Ok(Some((surface, Vec2::splat(1.0))))
        }
    }
}

fn shape_surface(shape: &ShapeElement, size: Vec2, head_reservation: f32) -> ExportResult<Pixmap> {
    let (width, height) = surface_size(size);
    let mut surface = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(skia_color(shape.fill));

    if shape.variant.is_linear() {
        if let Some((a, b)) = shape.line_segment(size, head_reservation) {
            let mut pb = PathBuilder::new();
            pb.move_to(a.x, a.y);
            pb.line_to(b.x, b.y);
            if let Some(path) = pb.finish() {
                let stroke = Stroke {
                    width: shape.stroke_width.max(1.0),
                    ..Default::default()
                };
                surface.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        if let Some(head) = shape.arrow_head(size, head_reservation) {
            if let Some(path) = polygon_path(&head) {
                surface.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        return Ok(surface);
    }

    let border = &shape.border;
    let inset = if shape.variant.accepts_border() && border.is_visible() {
        border.width / 2.0
    } else {
        0.0
    };
    let Some(outline) = shape_outline(shape, size, inset) else {
        return Ok(surface);
    };
    surface.fill_path(&outline, &paint, FillRule::Winding, Transform::identity(), None);

    if inset > 0.0 {
        let mut border_paint = Paint::default();
        border_paint.anti_alias = true;
        border_paint.set_color(skia_color(border.color));
        for (stroke, extra) in border_strokes(border.style, border.width) {
            let path = if extra == 0.0 {
                Some(outline.clone())
            } else {
                shape_outline(shape, size, inset + extra)
            };
            if let Some(path) = path {
                surface.stroke_path(&path, &border_paint, &stroke, Transform::identity(), None);
            }
        }
    }

    Ok(surface)
}

/// Strokes for a border style, each with its extra inset from the outer edge
fn border_strokes(style: BorderStyle, width: f32) -> Vec<(Stroke, f32)> {
    let solid = |w: f32| Stroke {
        width: w,
        ..Default::default()
    };
    match style {
        BorderStyle::None => Vec::new(),
        BorderStyle::Solid => vec![(solid(width), 0.0)],
        BorderStyle::Dashed => {
            let mut stroke = solid(width);
            stroke.dash = StrokeDash::new(vec![width * 3.0, width * 2.0], 0.0);
            vec![(stroke, 0.0)]
        }
        BorderStyle::Dotted => {
            let mut stroke = solid(width);
            stroke.line_cap = LineCap::Round;
            stroke.dash = StrokeDash::new(vec![0.01, width * 2.0], 0.0);
            vec![(stroke, 0.0)]
        }
        BorderStyle::Double => {
            let line = width / 3.0;
            vec![
                (solid(line), -line),
                (solid(line), line),
            ]
        }
    }
}

/// Outline of a boxed shape shrunk by `inset` on every side
fn shape_outline(shape: &ShapeElement, size: Vec2, inset: f32) -> Option<tiny_skia::Path> {
    let inner = size - Vec2::splat(inset * 2.0);
    if inner.x <= 0.0 || inner.y <= 0.0 {
        return None;
    }
    if shape.variant == ShapeVariant::Circle {
        let rect = Rect::from_xywh(inset, inset, inner.x, inner.y)?;
        return PathBuilder::from_oval(rect);
    }
    match shape.polygon(inner) {
        Some(points) => {
            let shifted: Vec<_> = points.iter().map(|p| *p + Vec2::splat(inset)).collect();
            polygon_path(&shifted)
        }
        None => Rect::from_xywh(inset, inset, inner.x, inner.y).map(PathBuilder::from_rect),
    }
}

fn polygon_path(points: &[egui::Pos2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

fn text_surface(text: &TextElement, size: Vec2, fonts: &FontBook) -> ExportResult<Pixmap> {
    let (width, height) = surface_size(size);
    let mut surface = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;

    let style = &text.style;
    let Some(font) = fonts.font_for(&style.font_family, style.bold, style.italic) else {
        return Ok(surface);
    };
    let scale = Scale::uniform(style.font_size);
    let v_metrics = font.v_metrics(scale);
    let line_height = style.font_size * style.line_height;
    let glyph_height = v_metrics.ascent - v_metrics.descent;
    let [r, g, b, a] = style.color.to_srgba_unmultiplied();
    let content_width = size.x - TEXT_PADDING.x * 2.0;

    for (row, line) in text.content.lines().enumerate() {
        let line_width = font
            .layout(line, scale, rt_point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let x = TEXT_PADDING.x
            + match style.align {
                TextAlign::Left | TextAlign::Justify => 0.0,
                TextAlign::Center => (content_width - line_width) / 2.0,
                TextAlign::Right => content_width - line_width,
            };
        let top = TEXT_PADDING.y + row as f32 * line_height + (line_height - glyph_height) / 2.0;
        let baseline = top + v_metrics.ascent;

        for glyph in font.layout(line, scale, rt_point(x, baseline)) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bounds.min.x;
                let py = gy as i32 + bounds.min.y;
                blend_pixel(&mut surface, px, py, [r, g, b, a], coverage);
            });
        }

        if style.underline && line_width > 0.0 {
            let thickness = (style.font_size / 14.0).max(1.0);
            if let Some(rect) = Rect::from_xywh(x, baseline + thickness * 1.5, line_width, thickness) {
                let mut paint = Paint::default();
                paint.set_color(skia_color(style.color));
                surface.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }

    Ok(surface)
}

/// Source-over one glyph pixel onto a premultiplied surface
fn blend_pixel(surface: &mut Pixmap, x: i32, y: i32, color: [u8; 4], coverage: f32) {
    let (width, height) = (surface.width() as i32, surface.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let idx = ((y * width + x) * 4) as usize;
    let pixel = &mut surface.data_mut()[idx..idx + 4];
    for channel in 0..3 {
        let src = color[channel] as f32 * alpha;
        pixel[channel] = (src + pixel[channel] as f32 * (1.0 - alpha)).round() as u8;
    }
    pixel[3] = (alpha * 255.0 + pixel[3] as f32 * (1.0 - alpha)).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).map(|p| p.demultiply());
        c.map(|c| [c.red(), c.green(), c.blue(), c.alpha()]).unwrap_or([0; 4])
    }

    #[test]
    fn empty_page_is_white_at_page_size() {
        let background = Background::default();
        let images = PageImages::default();
        let input = RasterInput {
            size: Vec2::new(40.0, 30.0),
            background: &background,
            elements: Vec::new(),
            images: &images,
            fonts: None,
            arrow_head_reservation: 30.0,
        };
        let pixmap = render_page(&input).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 30));
        assert_eq!(pixel(&pixmap, 20, 15), [255, 255, 255, 255]);
    }

    #[test]
    fn shapes_are_drawn_in_place() {
        let mut rect = factory::create_shape(ShapeVariant::Rectangle, Vec2::new(100.0, 100.0));
        rect.position = egui::pos2(10.0, 10.0);
        rect.size = Vec2::new(20.0, 20.0);
        if let Some(shape) = rect.as_shape_mut() {
            shape.fill = Color32::from_rgb(255, 0, 0);
        }
        let background = Background::default();
        let images = PageImages::default();
        let input = RasterInput {
            size: Vec2::new(100.0, 100.0),
            background: &background,
            elements: vec![&rect],
            images: &images,
            fonts: None,
            arrow_head_reservation: 30.0,
        };
        let pixmap = render_page(&input).unwrap();
        assert_eq!(pixel(&pixmap, 20, 20), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 50, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn missing_image_is_skipped() {
        let element = factory::create_media(
            MediaVariant::Image,
            crate::element::MediaSource::url("https://example.test/a.png"),
            Some(Vec2::new(10.0, 10.0)),
            Vec2::new(50.0, 50.0),
        );
        let background = Background::default();
        let images = PageImages::default();
        let input = RasterInput {
            size: Vec2::new(50.0, 50.0),
            background: &background,
            elements: vec![&element],
            images: &images,
            fonts: None,
            arrow_head_reservation: 30.0,
        };
        assert!(render_page(&input).is_ok());
    }

    #[test]
    fn cover_and_contain_sizes() {
        let image = Vec2::new(200.0, 100.0);
        let page = Vec2::new(100.0, 100.0);
        assert_eq!(background_draw_size(image, page, BackgroundSize::Cover), Vec2::new(200.0, 100.0));
        assert_eq!(background_draw_size(image, page, BackgroundSize::Contain), Vec2::new(100.0, 50.0));
        assert_eq!(background_draw_size(image, page, BackgroundSize::Stretch), page);
    }
}
