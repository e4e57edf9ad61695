use egui::{Pos2, Rect, Vec2};

use crate::config::GestureConfig;
use crate::element::{Element, ElementBody};
use crate::widgets::resize_handle::HandlePosition;

/// Constraints a resize has to respect for one element
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRules {
    /// Smallest allowed width and height
    pub min_size: Vec2,
    /// Width and height always equal (circles)
    pub aspect_locked: bool,
    /// Only the horizontal extent may change (lines, arrows)
    pub horizontal_only: bool,
    pub page_size: Vec2,
    /// Distance moving edges must keep from the page border
    pub margin: f32,
}

impl ResizeRules {
    pub fn for_element(element: &Element, config: &GestureConfig, page_size: Vec2) -> Self {
        let min = config.min_resize;
        let (min_size, aspect_locked, horizontal_only) = match &element.body {
            ElementBody::Shape(shape) if shape.variant.is_linear() => {
                (Vec2::new(config.min_line_length, min), false, true)
            }
            ElementBody::Shape(shape) if shape.variant.is_aspect_locked() => (Vec2::splat(min), true, false),
            _ => (Vec2::splat(min), false, false),
        };
        Self {
            min_size,
            aspect_locked,
            horizontal_only,
            page_size,
            margin: config.edge_margin,
        }
    }
}

/// New bounding box for dragging `handle` by `delta` page pixels from `start`.
///
/// Edges the handle does not move stay where they were. Moving edges stop at
/// the page border, but the minimum size always wins over the border. For
/// aspect-locked elements the larger side is applied to both axes before the
/// origin is recomputed, so the opposite corner stays fixed.
pub fn resize_rect(start: Rect, handle: HandlePosition, delta: Vec2, rules: &ResizeRules) -> Rect {
    let moves_left = handle.moves_left();
    let moves_right = handle.moves_right();
    let (moves_top, moves_bottom) = if rules.horizontal_only {
        (false, false)
    } else {
        (handle.moves_top(), handle.moves_bottom())
    };

    if !(moves_left || moves_right || moves_top || moves_bottom) {
        return start;
    }

    let max_width = if moves_left {
        start.right() - rules.margin
    } else {
        rules.page_size.x - rules.margin - start.left()
    };
    let max_height = if moves_top {
        start.bottom() - rules.margin
    } else {
        rules.page_size.y - rules.margin - start.top()
    };

    let mut width = start.width();
    if moves_left {
        width = (start.width() - delta.x).min(max_width).max(rules.min_size.x);
    } else if moves_right {
        width = (start.width() + delta.x).min(max_width).max(rules.min_size.x);
    }
    let mut height = start.height();
    if moves_top {
        height = (start.height() - delta.y).min(max_height).max(rules.min_size.y);
    } else if moves_bottom {
        height = (start.height() + delta.y).min(max_height).max(rules.min_size.y);
    }

    if rules.aspect_locked {
        let side = width
            .max(height)
            .min(max_width.min(max_height))
            .max(rules.min_size.x.max(rules.min_size.y));
        width = side;
        height = side;
    }

    let left = if moves_left { start.right() - width } else { start.left() };
    let top = if moves_top { start.bottom() - height } else { start.top() };
    Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ResizeRules {
        ResizeRules {
            min_size: Vec2::splat(20.0),
            aspect_locked: false,
            horizontal_only: false,
            page_size: Vec2::new(800.0, 600.0),
            margin: 1.0,
        }
    }

    fn start() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(100.0, 100.0))
    }

    #[test]
    fn right_handle_grows_width_only() {
        let r = resize_rect(start(), HandlePosition::Right, Vec2::new(50.0, 30.0), &rules());
        assert_eq!(r, Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(150.0, 100.0)));
    }

    #[test]
    fn left_handle_keeps_right_edge() {
        let r = resize_rect(start(), HandlePosition::Left, Vec2::new(30.0, 0.0), &rules());
        assert_eq!(r.right(), 200.0);
        assert_eq!(r.width(), 70.0);
    }

    #[test]
    fn minimum_size_holds_opposite_edge() {
        let r = resize_rect(start(), HandlePosition::TopLeft, Vec2::new(500.0, 500.0), &rules());
        assert_eq!(r.size(), Vec2::splat(20.0));
        assert_eq!(r.max, Pos2::new(200.0, 200.0));
    }

    #[test]
    fn moving_edge_stops_at_page_border() {
        let r = resize_rect(start(), HandlePosition::BottomRight, Vec2::new(1000.0, 1000.0), &rules());
        assert_eq!(r.max, Pos2::new(799.0, 599.0));
        let r = resize_rect(start(), HandlePosition::TopLeft, Vec2::new(-1000.0, -1000.0), &rules());
        assert_eq!(r.min, Pos2::new(1.0, 1.0));
    }

    #[test]
    fn aspect_lock_uses_larger_side() {
        let locked = ResizeRules {
            aspect_locked: true,
            ..rules()
        };
        let r = resize_rect(start(), HandlePosition::TopLeft, Vec2::new(-40.0, -10.0), &locked);
        assert_eq!(r.width(), r.height());
        assert_eq!(r.width(), 140.0);
        assert_eq!(r.max, Pos2::new(200.0, 200.0));
    }

    #[test]
    fn horizontal_only_ignores_vertical_handles() {
        let line = ResizeRules {
            horizontal_only: true,
            min_size: Vec2::new(100.0, 20.0),
            ..rules()
        };
        let thin = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 24.0));
        assert_eq!(resize_rect(thin, HandlePosition::Top, Vec2::new(0.0, -50.0), &line), thin);
        let r = resize_rect(thin, HandlePosition::BottomRight, Vec2::new(-150.0, 40.0), &line);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 24.0);
    }
}
