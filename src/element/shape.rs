use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{
    DEFAULT_LINE_SIZE, DEFAULT_POLYGON_SIZE, DEFAULT_SHAPE_SIZE, color_to_hex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeVariant {
    Rectangle,
    Circle,
    Triangle,
    Line,
    Arrow,
    Star,
    Hexagon,
}

impl ShapeVariant {
    pub const ALL: [ShapeVariant; 7] = [
        ShapeVariant::Rectangle,
        ShapeVariant::Circle,
        ShapeVariant::Triangle,
        ShapeVariant::Line,
        ShapeVariant::Arrow,
        ShapeVariant::Star,
        ShapeVariant::Hexagon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeVariant::Rectangle => "rectangle",
            ShapeVariant::Circle => "circle",
            ShapeVariant::Triangle => "triangle",
            ShapeVariant::Line => "line",
            ShapeVariant::Arrow => "arrow",
            ShapeVariant::Star => "star",
            ShapeVariant::Hexagon => "hexagon",
        }
    }

    pub fn default_size(&self) -> Vec2 {
        match self {
            ShapeVariant::Line | ShapeVariant::Arrow => DEFAULT_LINE_SIZE,
            ShapeVariant::Star | ShapeVariant::Hexagon => DEFAULT_POLYGON_SIZE,
            _ => DEFAULT_SHAPE_SIZE,
        }
    }

    /// Lines and arrows are drawn as a stroked path instead of a filled box
    pub fn is_linear(&self) -> bool {
        matches!(self, ShapeVariant::Line | ShapeVariant::Arrow)
    }

    /// Width and height are kept equal while resizing
    pub fn is_aspect_locked(&self) -> bool {
        matches!(self, ShapeVariant::Circle)
    }

    /// Clipped polygons hide the border, so border edits don't apply
    pub fn accepts_border(&self) -> bool {
        !matches!(self, ShapeVariant::Star | ShapeVariant::Hexagon)
    }

    pub fn accepts_border_style(&self) -> bool {
        self.accepts_border() && !self.is_linear()
    }

    /// Outline in unit coordinates (0..1 on both axes) for polygon variants
    pub fn unit_polygon(&self) -> Option<&'static [(f32, f32)]> {
        const TRIANGLE: [(f32, f32); 3] = [(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)];
        const STAR: [(f32, f32); 10] = [
            (0.50, 0.00),
            (0.61, 0.35),
            (0.98, 0.35),
            (0.68, 0.57),
            (0.79, 0.91),
            (0.50, 0.70),
            (0.21, 0.91),
            (0.32, 0.57),
            (0.02, 0.35),
            (0.39, 0.35),
        ];
        const HEXAGON: [(f32, f32); 6] = [
            (0.25, 0.0),
            (0.75, 0.0),
            (1.0, 0.5),
            (0.75, 1.0),
            (0.25, 1.0),
            (0.0, 0.5),
        ];
        match self {
            ShapeVariant::Triangle => Some(&TRIANGLE),
            ShapeVariant::Star => Some(&STAR),
            ShapeVariant::Hexagon => Some(&HEXAGON),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

impl BorderStyle {
    pub const ALL: [BorderStyle; 5] = [
        BorderStyle::Solid,
        BorderStyle::Dashed,
        BorderStyle::Dotted,
        BorderStyle::Double,
        BorderStyle::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
            BorderStyle::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Color32,
    pub width: f32,
    pub style: BorderStyle,
}

impl Border {
    pub const NONE: Border = Border {
        color: Color32::TRANSPARENT,
        width: 0.0,
        style: BorderStyle::None,
    };

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.style != BorderStyle::None && self.color.a() > 0
    }
}

impl Default for Border {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 1.0,
            style: BorderStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub variant: ShapeVariant,
    /// Fill for boxed shapes; stroke and arrowhead colour for lines and arrows
    pub fill: Color32,
    pub border: Border,
    /// Stroke width for lines and arrows
    pub stroke_width: f32,
}

impl ShapeElement {
    pub fn new(variant: ShapeVariant) -> Self {
        match variant {
            ShapeVariant::Line => Self {
                variant,
                fill: Color32::BLACK,
                border: Border::NONE,
                stroke_width: 2.0,
            },
            ShapeVariant::Arrow => Self {
                variant,
                fill: Color32::BLACK,
                border: Border::NONE,
                stroke_width: 8.0,
            },
            _ => Self {
                variant,
                fill: Color32::WHITE,
                border: Border::default(),
                stroke_width: 0.0,
            },
        }
    }

    /// Endpoints of the visible segment in element-local coordinates.
    ///
    /// The arrow's segment stops short of the box by `head_reservation` so the
    /// head keeps its size however long the arrow gets.
    pub fn line_segment(&self, size: Vec2, head_reservation: f32) -> Option<(Pos2, Pos2)> {
        let y = size.y / 2.0;
        match self.variant {
            ShapeVariant::Line => Some((Pos2::new(0.0, y), Pos2::new(size.x, y))),
            ShapeVariant::Arrow => Some((
                Pos2::new(0.0, y),
                Pos2::new((size.x - head_reservation).max(0.0), y),
            )),
            _ => None,
        }
    }

    /// Arrowhead triangle (`M0,0 L30,15 L0,30 Z`) placed at the segment end, local coordinates
    pub fn arrow_head(&self, size: Vec2, head_reservation: f32) -> Option<[Pos2; 3]> {
        if self.variant != ShapeVariant::Arrow {
            return None;
        }
        let tip_x = size.x;
        let base_x = (size.x - head_reservation).max(0.0);
        let half = head_reservation / 2.0;
        let y = size.y / 2.0;
        Some([
            Pos2::new(base_x, y - half),
            Pos2::new(tip_x, y),
            Pos2::new(base_x, y + half),
        ])
    }

    /// Polygon outline scaled to `size`, local coordinates
    pub fn polygon(&self, size: Vec2) -> Option<Vec<Pos2>> {
        self.variant.unit_polygon().map(|points| {
            points
                .iter()
                .map(|(x, y)| Pos2::new(x * size.x, y * size.y))
                .collect()
        })
    }

    pub fn style_fragment(&self) -> String {
        if self.variant.is_linear() {
            return format!(
                "background-color: transparent; border: none; stroke: {}; stroke-width: {};",
                color_to_hex(self.fill),
                self.stroke_width
            );
        }
        let radius = if self.variant == ShapeVariant::Circle {
            " border-radius: 50%;"
        } else {
            ""
        };
        format!(
            "background-color: {}; border: {}px {} {};{}",
            color_to_hex(self.fill),
            self.border.width,
            self.border.style.as_str(),
            color_to_hex(self.border.color),
            radius
        )
    }
}
