use egui::{Color32, CursorIcon, Id, Pos2, Rect, Response, Stroke, Ui, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::ElementId;

/// One of the eight directional resize handles around a selected element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::Top,
        HandlePosition::TopRight,
        HandlePosition::Left,
        HandlePosition::Right,
        HandlePosition::BottomLeft,
        HandlePosition::Bottom,
        HandlePosition::BottomRight,
    ];

    /// The only handles that work on lines and arrows
    pub const HORIZONTAL: [HandlePosition; 2] = [HandlePosition::Left, HandlePosition::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlePosition::TopLeft => "top-left",
            HandlePosition::Top => "top",
            HandlePosition::TopRight => "top-right",
            HandlePosition::Left => "left",
            HandlePosition::Right => "right",
            HandlePosition::BottomLeft => "bottom-left",
            HandlePosition::Bottom => "bottom",
            HandlePosition::BottomRight => "bottom-right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandlePosition::TopLeft | HandlePosition::BottomRight => CursorIcon::ResizeNwSe,
            HandlePosition::TopRight | HandlePosition::BottomLeft => CursorIcon::ResizeNeSw,
            HandlePosition::Top | HandlePosition::Bottom => CursorIcon::ResizeVertical,
            HandlePosition::Left | HandlePosition::Right => CursorIcon::ResizeHorizontal,
        }
    }

    pub fn moves_left(&self) -> bool {
        matches!(self, HandlePosition::TopLeft | HandlePosition::Left | HandlePosition::BottomLeft)
    }

    pub fn moves_right(&self) -> bool {
        matches!(self, HandlePosition::TopRight | HandlePosition::Right | HandlePosition::BottomRight)
    }

    pub fn moves_top(&self) -> bool {
        matches!(self, HandlePosition::TopLeft | HandlePosition::Top | HandlePosition::TopRight)
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(self, HandlePosition::BottomLeft | HandlePosition::Bottom | HandlePosition::BottomRight)
    }

    /// Where this handle sits on an unrotated box
    pub fn point_on(&self, rect: Rect) -> Pos2 {
        let x = if self.moves_left() {
            rect.left()
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.center().x
        };
        let y = if self.moves_top() {
            rect.top()
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.center().y
        };
        Pos2::new(x, y)
    }
}

/// Anything the pointer can grab on a selected element besides its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    Resize(HandlePosition),
    Rotate,
}

impl Handle {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::Resize(position) => position.cursor_icon(),
            Handle::Rotate => CursorIcon::Grab,
        }
    }
}

/// A resize or rotate handle widget drawn on top of the canvas
pub struct ResizeHandle {
    element_id: ElementId,
    handle: Handle,
    position: Pos2,
    size: f32,
}

impl ResizeHandle {
    pub fn new(element_id: ElementId, handle: Handle, position: Pos2, size: f32) -> Self {
        Self {
            element_id,
            handle,
            position,
            size,
        }
    }

    /// Show the handle and return the response
    pub fn show(&self, ui: &mut Ui) -> Response {
        let id = Id::new(("resize_handle", self.element_id, self.handle));
        let rect = Rect::from_center_size(self.position, Vec2::splat(self.size));

        match self.handle {
            Handle::Resize(_) => {
                ui.painter().rect_filled(rect, 2.0, Color32::WHITE);
                ui.painter()
                    .rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::from_rgb(30, 120, 255)));
            }
            Handle::Rotate => Self::draw_simple_handle(ui, self.position, self.size / 2.0),
        }

        ui.interact(rect, id, egui::Sense::click_and_drag())
            .on_hover_cursor(self.handle.cursor_icon())
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    /// Draw a round handle without interaction
    pub fn draw_simple_handle(ui: &mut Ui, position: Pos2, radius: f32) {
        ui.painter()
            .circle_filled(position, radius, Color32::from_rgb(30, 120, 255));
        ui.painter()
            .circle_stroke(position, radius, Stroke::new(1.0, Color32::WHITE));
    }
}
