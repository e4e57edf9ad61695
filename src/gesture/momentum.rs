use egui::Vec2;

use crate::element::ElementId;

/// Glide that continues a released drag, decaying by `friction` every frame.
///
/// Momentum is presentation only: the drag that started it has already been
/// recorded, and the glide itself never produces a history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Momentum {
    id: ElementId,
    velocity: Vec2,
    friction: f32,
    min_speed: f32,
}

impl Momentum {
    pub fn new(id: ElementId, velocity: Vec2, friction: f32, min_speed: f32) -> Self {
        Self {
            id,
            velocity,
            friction,
            min_speed,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether a drag released at `velocity` is fast enough to glide
    pub fn is_significant(velocity: Vec2, min_speed: f32) -> bool {
        velocity.x.abs() > min_speed || velocity.y.abs() > min_speed
    }

    /// Displacement for this frame, or `None` once the glide has died out
    pub fn step(&mut self) -> Option<Vec2> {
        if !Self::is_significant(self.velocity, self.min_speed) {
            return None;
        }
        let delta = self.velocity;
        self.velocity *= self.friction;
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glide_decays_and_stops() {
        let mut momentum = Momentum::new(ElementId::new(), Vec2::new(10.0, 0.0), 0.95, 0.1);
        let first = momentum.step().unwrap();
        assert_eq!(first, Vec2::new(10.0, 0.0));
        assert!((momentum.velocity().x - 9.5).abs() < 1e-4);

        let mut frames = 1;
        while momentum.step().is_some() {
            frames += 1;
            assert!(frames < 1000);
        }
        // 10 * 0.95^n <= 0.1
        assert!(frames > 80);
        assert!(momentum.step().is_none());
    }

    #[test]
    fn slow_release_does_not_glide() {
        assert!(!Momentum::is_significant(Vec2::new(0.05, -0.1), 0.1));
        assert!(Momentum::is_significant(Vec2::new(0.0, -0.2), 0.1));
    }
}
