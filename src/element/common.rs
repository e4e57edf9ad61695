use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

// Common constants for all element kinds
pub const DEFAULT_SHAPE_SIZE: Vec2 = Vec2::new(100.0, 100.0);
pub const DEFAULT_LINE_SIZE: Vec2 = Vec2::new(200.0, 24.0);
pub const DEFAULT_POLYGON_SIZE: Vec2 = Vec2::new(120.0, 120.0);
pub const DEFAULT_VIDEO_SIZE: Vec2 = Vec2::new(500.0, 300.0);
/// Inserted images are scaled down to fit this box
pub const MEDIA_FIT_SIZE: f32 = 500.0;
pub const TEXT_MIN_WIDTH: f32 = 30.0;
pub const TEXT_PADDING: Vec2 = Vec2::new(8.0, 4.0);

/// Which point of the element its stored position refers to.
///
/// Text is placed by its center, everything else by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Center,
    TopLeft,
}

/// Wrap an angle in degrees into [0, 360). Non-finite input becomes 0.
pub fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate `point` around `center` by `degrees` (clockwise in screen space)
pub fn rotate_point(point: Pos2, center: Pos2, degrees: f32) -> Pos2 {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Distance from a point to a line segment, used for hit testing lines and arrows
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// `#rrggbb`, or `#rrggbbaa` when not fully opaque
pub fn color_to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Also accepts `transparent`.
pub fn color_from_hex(text: &str) -> Option<Color32> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("transparent") {
        return Some(Color32::TRANSPARENT);
    }
    let hex = text.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(Color32::from_rgb(out[0], out[1], out[2]))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_wrap() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn non_finite_degrees_reset() {
        assert_eq!(normalize_degrees(f32::NAN), 0.0);
        assert_eq!(normalize_degrees(f32::INFINITY), 0.0);
        assert_eq!(normalize_degrees(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(color_to_hex(Color32::from_rgb(255, 0, 16)), "#ff0010");
        assert_eq!(color_from_hex("#ff0010"), Some(Color32::from_rgb(255, 0, 16)));
        assert_eq!(color_from_hex("#fff"), Some(Color32::WHITE));
        assert_eq!(color_from_hex("red"), None);
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = rotate_point(Pos2::new(10.0, 0.0), Pos2::ZERO, 90.0);
        assert!((p.x - 0.0).abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }
}
