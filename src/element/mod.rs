use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;
pub mod media;
pub mod shape;
pub mod text;

pub use common::{
    Anchor, DEFAULT_VIDEO_SIZE, MEDIA_FIT_SIZE, TEXT_PADDING, color_from_hex, color_to_hex, normalize_degrees,
    rotate_point,
};
pub(crate) use common::distance_to_line_segment;
pub use media::{MediaElement, MediaSource, MediaVariant, Playback};
pub use shape::{Border, BorderStyle, ShapeElement, ShapeVariant};
pub use text::{TextAlign, TextElement, TextRole, TextStyle};

/// Unique identifier of an element, stable across save/restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element-{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Shape,
    Media,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Shape => "shape",
            ElementKind::Media => "media",
        }
    }
}

/// Behaviour shared by the kind-specific payloads
pub trait ElementContent {
    fn kind(&self) -> ElementKind;

    /// Kind-specific part of the inline style string
    fn style_fragment(&self) -> String;

    /// Where the stored position sits on the element's box
    fn anchor(&self) -> Anchor {
        Anchor::TopLeft
    }
}

impl ElementContent for TextElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn style_fragment(&self) -> String {
        TextElement::style_fragment(self)
    }

    fn anchor(&self) -> Anchor {
        Anchor::Center
    }
}

impl ElementContent for ShapeElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Shape
    }

    fn style_fragment(&self) -> String {
        ShapeElement::style_fragment(self)
    }
}

impl ElementContent for MediaElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Media
    }

    fn style_fragment(&self) -> String {
        MediaElement::style_fragment(self)
    }
}

/// Kind-specific payload of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Text(TextElement),
    Shape(ShapeElement),
    Media(MediaElement),
}

impl ElementContent for ElementBody {
    fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Text(t) => t.kind(),
            ElementBody::Shape(s) => s.kind(),
            ElementBody::Media(m) => m.kind(),
        }
    }

    fn style_fragment(&self) -> String {
        match self {
            ElementBody::Text(t) => ElementContent::style_fragment(t),
            ElementBody::Shape(s) => ElementContent::style_fragment(s),
            ElementBody::Media(m) => ElementContent::style_fragment(m),
        }
    }

    fn anchor(&self) -> Anchor {
        match self {
            ElementBody::Text(t) => t.anchor(),
            ElementBody::Shape(s) => s.anchor(),
            ElementBody::Media(m) => m.anchor(),
        }
    }
}

/// A placed object on a page.
///
/// `position` is the element's anchor point in page pixels: the center for
/// text, the top-left corner for shapes and media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub position: Pos2,
    pub size: Vec2,
    /// Degrees in [0, 360)
    pub rotation: f32,
    pub z_index: i32,
    /// 0.0..=1.0
    pub opacity: f32,
    pub body: ElementBody,
}

impl Element {
    pub fn new(body: ElementBody, position: Pos2, size: Vec2) -> Self {
        Self {
            id: ElementId::new(),
            position,
            size,
            rotation: 0.0,
            z_index: 0,
            opacity: 1.0,
            body,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn element_type(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn anchor(&self) -> Anchor {
        self.body.anchor()
    }

    /// Unrotated bounding box in page coordinates
    pub fn rect(&self) -> Rect {
        match self.anchor() {
            Anchor::Center => Rect::from_center_size(self.position, self.size),
            Anchor::TopLeft => Rect::from_min_size(self.position, self.size),
        }
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    /// Move and resize to `rect`, storing the position per this element's anchor
    pub fn set_rect(&mut self, rect: Rect) {
        self.size = rect.size();
        self.position = match self.anchor() {
            Anchor::Center => rect.center(),
            Anchor::TopLeft => rect.min,
        };
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Test a page-space point against the element, honouring rotation.
    ///
    /// Lines and arrows only hit near their stroke.
    pub fn hit_test(&self, pos: Pos2) -> bool {
        let rect = self.rect();
        let local = rotate_point(pos, rect.center(), -self.rotation);
        match &self.body {
            ElementBody::Shape(shape) if shape.variant.is_linear() => {
                let offset = rect.min.to_vec2();
                let Some((a, b)) = shape.line_segment(self.size, 0.0) else {
                    return false;
                };
                let tolerance = (self.size.y / 2.0).max(shape.stroke_width);
                distance_to_line_segment(local, a + offset, b + offset) <= tolerance
            }
            _ => rect.contains(local),
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.body {
            ElementBody::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match &mut self.body {
            ElementBody::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match &self.body {
            ElementBody::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeElement> {
        match &mut self.body {
            ElementBody::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaElement> {
        match &self.body {
            ElementBody::Media(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_media_mut(&mut self) -> Option<&mut MediaElement> {
        match &mut self.body {
            ElementBody::Media(m) => Some(m),
            _ => None,
        }
    }

    /// Editable content: the text of a text element, the source of a media element
    pub fn content(&self) -> String {
        match &self.body {
            ElementBody::Text(t) => t.content.clone(),
            ElementBody::Shape(_) => String::new(),
            ElementBody::Media(m) => m.source.describe(),
        }
    }

    /// CSS-like inline style describing geometry and look
    pub fn style_string(&self) -> String {
        let transform = match self.anchor() {
            Anchor::Center => format!("translate(-50%, -50%) rotate({}deg)", self.rotation),
            Anchor::TopLeft => format!("rotate({}deg)", self.rotation),
        };
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px; transform: {}; z-index: {}; opacity: {}; {}",
            self.position.x,
            self.position.y,
            self.size.x,
            self.size.y,
            transform,
            self.z_index,
            self.opacity,
            self.body.style_fragment()
        )
    }
}

/// Factory functions for creating elements centred on a page of `page_size`
pub mod factory {
    use super::*;

    /// Create a text element. It is center-anchored, so its position is the page center.
    pub fn create_text(content: &str, font_size: f32, page_size: Vec2) -> Element {
        let text = TextElement::new(content, font_size);
        let size = text.measure();
        let center = (page_size / 2.0).to_pos2();
        Element::new(ElementBody::Text(text), center, size)
    }

    pub fn create_shape(variant: ShapeVariant, page_size: Vec2) -> Element {
        let size = variant.default_size();
        let position = ((page_size - size) / 2.0).to_pos2();
        Element::new(ElementBody::Shape(ShapeElement::new(variant)), position, size)
    }

    /// Create an image or video element. Images are fitted into the insertion box
    /// keeping the aspect ratio of `intrinsic_size`.
    pub fn create_media(
        variant: MediaVariant,
        source: MediaSource,
        intrinsic_size: Option<Vec2>,
        page_size: Vec2,
    ) -> Element {
        let size = match variant {
            MediaVariant::Image => media::fit_media_size(
                intrinsic_size.unwrap_or(Vec2::splat(MEDIA_FIT_SIZE)),
            ),
            MediaVariant::Video => DEFAULT_VIDEO_SIZE,
        };
        let position = ((page_size - size) / 2.0).to_pos2();
        let media = MediaElement::new(variant, source, intrinsic_size);
        Element::new(ElementBody::Media(media), position, size)
    }
}
