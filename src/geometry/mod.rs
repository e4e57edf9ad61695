//! Page-space geometry: edge clamping, zoom-aware coordinate conversion and
//! handle hit testing.

mod bounds;
mod coords;
pub mod hit_testing;

pub use bounds::{clamp_element, clamp_position, clamp_to_range};
pub use coords::{Viewport, fit_zoom};
