use egui::Pos2;

use crate::element::{Element, ElementId, rotate_point};
use crate::widgets::resize_handle::{Handle, HandlePosition};

/// Page-space location of every live handle of `element`, rotated with it.
///
/// The rotation handle sits `rotate_offset` above the top edge's midpoint.
pub fn handle_points(
    element: &Element,
    resize_handles: &[HandlePosition],
    rotatable: bool,
    rotate_offset: f32,
) -> Vec<(Handle, Pos2)> {
    let rect = element.rect();
    let center = rect.center();
    let mut points: Vec<(Handle, Pos2)> = resize_handles
        .iter()
        .map(|position| {
            let p = rotate_point(position.point_on(rect), center, element.rotation);
            (Handle::Resize(*position), p)
        })
        .collect();

    if rotatable {
        let top_mid = Pos2::new(center.x, rect.top() - rotate_offset);
        points.push((Handle::Rotate, rotate_point(top_mid, center, element.rotation)));
    }
    points
}

/// The handle under `pos`, if any. `radius` is in page units.
pub fn hit_handle(
    element: &Element,
    resize_handles: &[HandlePosition],
    rotatable: bool,
    rotate_offset: f32,
    pos: Pos2,
    radius: f32,
) -> Option<Handle> {
    handle_points(element, resize_handles, rotatable, rotate_offset)
        .into_iter()
        .filter(|(_, p)| p.distance(pos) <= radius)
        .min_by(|(_, a), (_, b)| a.distance(pos).total_cmp(&b.distance(pos)))
        .map(|(handle, _)| handle)
}

/// Topmost element (highest z-index, later insertion wins ties) under `pos`
pub fn topmost_element_at(elements: &[Element], pos: Pos2) -> Option<ElementId> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.hit_test(pos))
        .max_by_key(|(index, e)| (e.z_index, *index))
        .map(|(_, e)| e.id)
}

/// Rotation angle for a pointer position: 0° when the pointer is straight above the center
pub fn rotation_from_pointer(center: Pos2, pointer: Pos2) -> f32 {
    let angle = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    crate::element::normalize_degrees(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeVariant, factory};
    use egui::Vec2;

    #[test]
    fn rotation_rest_position_is_zero() {
        let c = Pos2::new(100.0, 100.0);
        assert!(rotation_from_pointer(c, Pos2::new(100.0, 50.0)).abs() < 1e-4);
        assert!((rotation_from_pointer(c, Pos2::new(150.0, 100.0)) - 90.0).abs() < 1e-4);
        assert!((rotation_from_pointer(c, Pos2::new(50.0, 100.0)) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn handle_hits_follow_rotation() {
        let mut shape = factory::create_shape(ShapeVariant::Rectangle, Vec2::new(800.0, 600.0));
        // box 350..450 × 250..350
        let hit = hit_handle(&shape, &HandlePosition::ALL, true, 30.0, Pos2::new(451.0, 351.0), 6.0);
        assert_eq!(hit, Some(Handle::Resize(HandlePosition::BottomRight)));

        shape.set_rotation(180.0);
        let hit = hit_handle(&shape, &HandlePosition::ALL, true, 30.0, Pos2::new(451.0, 351.0), 6.0);
        assert_eq!(hit, Some(Handle::Resize(HandlePosition::TopLeft)));

        // rotation handle is now below the box
        let hit = hit_handle(&shape, &HandlePosition::ALL, true, 30.0, Pos2::new(400.0, 380.0), 6.0);
        assert_eq!(hit, Some(Handle::Rotate));
    }
}
