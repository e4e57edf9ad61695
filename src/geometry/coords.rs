use egui::{Pos2, Rect, Vec2};

use crate::config::ZoomConfig;

/// Maps between screen points and page pixels for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of the page's top-left corner
    pub origin: Pos2,
    pub zoom: f32,
}

impl Viewport {
    pub fn new(origin: Pos2, zoom: f32) -> Self {
        Self { origin, zoom }
    }

    pub fn screen_to_page(&self, screen: Pos2) -> Pos2 {
        ((screen - self.origin) / self.zoom).to_pos2()
    }

    pub fn page_to_screen(&self, page: Pos2) -> Pos2 {
        self.origin + page.to_vec2() * self.zoom
    }

    /// Pointer deltas are divided by zoom, never applied raw
    pub fn screen_delta_to_page(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    pub fn page_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.page_to_screen(rect.min), self.page_to_screen(rect.max))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Pos2::ZERO, 1.0)
    }
}

/// Zoom that shows the whole page inside `available`, leaving the fit margin on each axis.
/// Never zooms in past 1.0.
pub fn fit_zoom(page_size: Vec2, available: Vec2, config: &ZoomConfig) -> f32 {
    let fit = ((available.x - config.fit_margin) / page_size.x)
        .min((available.y - config.fit_margin) / page_size.y)
        .min(1.0);
    if fit.is_finite() {
        fit.clamp(config.min, config.max)
    } else {
        config.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_divides_by_zoom() {
        let viewport = Viewport::new(Pos2::new(100.0, 50.0), 2.0);
        assert_eq!(viewport.screen_to_page(Pos2::new(300.0, 250.0)), Pos2::new(100.0, 100.0));
        assert_eq!(viewport.screen_delta_to_page(Vec2::new(10.0, -4.0)), Vec2::new(5.0, -2.0));
        assert_eq!(viewport.page_to_screen(Pos2::new(100.0, 100.0)), Pos2::new(300.0, 250.0));
    }

    #[test]
    fn fit_never_exceeds_one() {
        let config = ZoomConfig::default();
        assert_eq!(fit_zoom(Vec2::new(100.0, 100.0), Vec2::new(2000.0, 2000.0), &config), 1.0);
        let z = fit_zoom(Vec2::new(1080.0, 1080.0), Vec2::new(1280.0, 800.0), &config);
        assert!((z - 720.0 / 1080.0).abs() < 1e-6);
    }
}
