use egui::{Pos2, Vec2};

use crate::element::{Anchor, Element};

/// `value.clamp(lo, hi)` that pins to `lo` instead of panicking when the range is empty
pub fn clamp_to_range(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo { lo } else { value.clamp(lo, hi) }
}

/// Keep an element of `size` inside a page of `page_size`, `margin` px from each edge.
///
/// The allowed range of the stored position depends on the anchor: a
/// center-anchored element can go no closer than half its size to an edge.
pub fn clamp_position(anchor: Anchor, position: Pos2, size: Vec2, page_size: Vec2, margin: f32) -> Pos2 {
    let (lo, hi) = match anchor {
        Anchor::Center => {
            let half = size / 2.0;
            (half + Vec2::splat(margin), page_size - half - Vec2::splat(margin))
        }
        Anchor::TopLeft => (Vec2::splat(margin), page_size - size - Vec2::splat(margin)),
    };
    Pos2::new(
        clamp_to_range(position.x, lo.x, hi.x),
        clamp_to_range(position.y, lo.y, hi.y),
    )
}

/// Clamp an element in place. Returns true if it moved.
pub fn clamp_element(element: &mut Element, page_size: Vec2, margin: f32) -> bool {
    let clamped = clamp_position(element.anchor(), element.position, element.size, page_size, margin);
    let moved = clamped != element.position;
    element.position = clamped;
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn top_left_anchor_clamps_box_inside_page() {
        let size = Vec2::new(100.0, 50.0);
        let p = clamp_position(Anchor::TopLeft, Pos2::new(-20.0, 590.0), size, PAGE, 1.0);
        assert_eq!(p, Pos2::new(1.0, 549.0));
    }

    #[test]
    fn center_anchor_keeps_half_size_from_edges() {
        let size = Vec2::new(100.0, 40.0);
        let p = clamp_position(Anchor::Center, Pos2::new(790.0, 5.0), size, PAGE, 1.0);
        assert_eq!(p, Pos2::new(749.0, 21.0));
    }

    #[test]
    fn oversized_element_pins_to_margin() {
        let size = Vec2::new(900.0, 100.0);
        let p = clamp_position(Anchor::TopLeft, Pos2::new(300.0, 10.0), size, PAGE, 1.0);
        assert_eq!(p.x, 1.0);
    }
}
