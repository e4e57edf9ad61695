use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{TEXT_MIN_WIDTH, TEXT_PADDING, color_to_hex};

/// Preset text sizes offered by the "add text" buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRole {
    Heading,
    Subheading,
    Body,
}

impl TextRole {
    pub fn font_size(&self) -> f32 {
        match self {
            TextRole::Heading => 32.0,
            TextRole::Subheading => 24.0,
            TextRole::Body => 16.0,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            TextRole::Heading => "Heading",
            TextRole::Subheading => "Subheading",
            TextRole::Body => "Text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub const ALL: [TextAlign; 4] = [TextAlign::Left, TextAlign::Center, TextAlign::Right, TextAlign::Justify];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Families offered in the font picker
pub const FONT_FAMILIES: [&str; 8] = [
    "Open Sans",
    "Arial",
    "Helvetica",
    "Georgia",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Trebuchet MS",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Open Sans".to_owned(),
            font_size: 16.0,
            color: Color32::BLACK,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            line_height: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub content: String,
    pub style: TextStyle,
}

impl TextElement {
    pub fn new(content: impl Into<String>, font_size: f32) -> Self {
        Self {
            content: content.into(),
            style: TextStyle {
                font_size,
                ..TextStyle::default()
            },
        }
    }

    /// Box the content occupies with the current style.
    ///
    /// Uses an average glyph advance of 0.6em, which is close enough for
    /// the sans-serif families the editor offers.
    pub fn measure(&self) -> Vec2 {
        let size = self.style.font_size;
        let lines: Vec<&str> = self.content.lines().collect();
        let line_count = lines.len().max(1) as f32;
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32;

        let width = (longest * size * 0.6 + TEXT_PADDING.x * 2.0).max(TEXT_MIN_WIDTH);
        let height = line_count * size * self.style.line_height + TEXT_PADDING.y * 2.0;
        Vec2::new(width.round(), height.round())
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn style_fragment(&self) -> String {
        let style = &self.style;
        format!(
            "font-family: {}; font-size: {}px; color: {}; font-weight: {}; font-style: {}; text-decoration: {}; text-align: {}; line-height: {};",
            style.font_family,
            style.font_size,
            color_to_hex(style.color),
            if style.bold { "bold" } else { "normal" },
            if style.italic { "italic" } else { "normal" },
            if style.underline { "underline" } else { "none" },
            style.align.as_str(),
            style.line_height,
        )
    }
}
