//! Two-way binding between the selected element and the property panel.
//!
//! [`PropertyValues`] is read out of an element whenever the selection
//! changes; a [`PropertyEdit`] is written back when a field changes.

use egui::{Color32, Pos2};

use crate::element::{BorderStyle, Element, ElementBody, Playback, ShapeVariant, TextAlign, TextStyle};

/// Every field the property panels show, populated from one element
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValues {
    pub position: Pos2,
    pub rotation: f32,
    /// 0..=100
    pub opacity_percent: f32,
    pub text: Option<TextStyle>,
    pub shape: Option<ShapeValues>,
    pub media: Option<Playback>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeValues {
    pub variant: ShapeVariant,
    pub fill: Color32,
    pub border_color: Color32,
    pub border_width: f32,
    pub border_style: BorderStyle,
    pub stroke_width: f32,
}

impl PropertyValues {
    pub fn from_element(element: &Element) -> Self {
        let mut values = Self {
            position: element.position,
            rotation: element.rotation.round(),
            opacity_percent: (element.opacity * 100.0).round(),
            text: None,
            shape: None,
            media: None,
        };
        match &element.body {
            ElementBody::Text(text) => values.text = Some(text.style.clone()),
            ElementBody::Shape(shape) => {
                values.shape = Some(ShapeValues {
                    variant: shape.variant,
                    fill: shape.fill,
                    border_color: shape.border.color,
                    border_width: shape.border.width,
                    border_style: shape.border.style,
                    stroke_width: shape.stroke_width,
                })
            }
            ElementBody::Media(media) => values.media = Some(media.playback.clone()),
        }
        values
    }
}

/// One field write from the property panel
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    FontFamily(String),
    FontSize(f32),
    TextColor(Color32),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Align(TextAlign),
    Fill(Color32),
    BorderColor(Color32),
    BorderWidth(f32),
    BorderStyle(BorderStyle),
    /// Slider value in percent
    Opacity(f32),
    Rotation(f32),
    PositionX(f32),
    PositionY(f32),
}

impl PropertyEdit {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyEdit::FontFamily(_) => "fontFamily",
            PropertyEdit::FontSize(_) => "fontSize",
            PropertyEdit::TextColor(_) => "color",
            PropertyEdit::Bold(_) => "fontWeight",
            PropertyEdit::Italic(_) => "fontStyle",
            PropertyEdit::Underline(_) => "textDecoration",
            PropertyEdit::Align(_) => "textAlign",
            PropertyEdit::Fill(_) => "fill",
            PropertyEdit::BorderColor(_) => "borderColor",
            PropertyEdit::BorderWidth(_) => "borderWidth",
            PropertyEdit::BorderStyle(_) => "borderStyle",
            PropertyEdit::Opacity(_) => "opacity",
            PropertyEdit::Rotation(_) => "rotation",
            PropertyEdit::PositionX(_) => "left",
            PropertyEdit::PositionY(_) => "top",
        }
    }

    /// Write the edit into `element`. Returns false when the edit does not
    /// apply to this kind of element.
    ///
    /// Fill on a line or arrow colours its stroke. Star and hexagon ignore
    /// border edits; lines and arrows ignore border style.
    pub fn apply(&self, element: &mut Element) -> bool {
        match self {
            PropertyEdit::Opacity(percent) => {
                element.opacity = percent.clamp(0.0, 100.0) / 100.0;
                true
            }
            PropertyEdit::Rotation(degrees) => {
                element.set_rotation(*degrees);
                true
            }
            PropertyEdit::PositionX(x) => {
                element.position.x = *x;
                true
            }
            PropertyEdit::PositionY(y) => {
                element.position.y = *y;
                true
            }
            PropertyEdit::FontFamily(_)
            | PropertyEdit::FontSize(_)
            | PropertyEdit::TextColor(_)
            | PropertyEdit::Bold(_)
            | PropertyEdit::Italic(_)
            | PropertyEdit::Underline(_)
            | PropertyEdit::Align(_) => self.apply_text(element),
            PropertyEdit::Fill(_)
            | PropertyEdit::BorderColor(_)
            | PropertyEdit::BorderWidth(_)
            | PropertyEdit::BorderStyle(_) => self.apply_shape(element),
        }
    }

    fn apply_text(&self, element: &mut Element) -> bool {
        let Some(text) = element.as_text_mut() else {
            return false;
        };
        let style = &mut text.style;
        match self {
            PropertyEdit::FontFamily(family) => style.font_family = family.clone(),
            PropertyEdit::FontSize(size) => style.font_size = size.clamp(1.0, 400.0),
            PropertyEdit::TextColor(color) => style.color = *color,
            PropertyEdit::Bold(on) => style.bold = *on,
            PropertyEdit::Italic(on) => style.italic = *on,
            PropertyEdit::Underline(on) => style.underline = *on,
            PropertyEdit::Align(align) => style.align = *align,
            _ => return false,
        }
        // Only metrics-bearing edits re-measure; other styling keeps a resized box
        if matches!(self, PropertyEdit::FontFamily(_) | PropertyEdit::FontSize(_)) {
            element.size = text.measure();
        }
        true
    }

    fn apply_shape(&self, element: &mut Element) -> bool {
        let Some(shape) = element.as_shape_mut() else {
            return false;
        };
        match self {
            PropertyEdit::Fill(color) => shape.fill = *color,
            PropertyEdit::BorderColor(color) if shape.variant.is_linear() => shape.fill = *color,
            PropertyEdit::BorderWidth(width) if shape.variant.is_linear() => {
                shape.stroke_width = width.max(0.0)
            }
            PropertyEdit::BorderColor(color) if shape.variant.accepts_border() => shape.border.color = *color,
            PropertyEdit::BorderWidth(width) if shape.variant.accepts_border() => {
                shape.border.width = width.max(0.0)
            }
            PropertyEdit::BorderStyle(style) if shape.variant.accepts_border_style() => {
                shape.border.style = *style
            }
            _ => return false,
        }
        true
    }
}
