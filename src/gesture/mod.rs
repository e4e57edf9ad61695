//! Pointer gestures on canvas elements: drag, resize and rotate.
//!
//! Pointer positions come in as screen coordinates and are converted through
//! the [`Viewport`], so deltas are divided by the zoom factor before they
//! touch page geometry.

mod momentum;
mod resize;

pub use momentum::Momentum;
pub use resize::{ResizeRules, resize_rect};

use egui::{Pos2, Vec2};

use crate::canvas::Canvas;
use crate::command::HistoryAction;
use crate::config::GestureConfig;
use crate::element::ElementId;
use crate::error::{ValidationError, ValidationResult};
use crate::event::{EditorEvent, EventBus};
use crate::geometry::hit_testing::rotation_from_pointer;
use crate::geometry::{Viewport, clamp_position};
use crate::state::EditorState;
use crate::widgets::resize_handle::Handle;

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerTarget {
    Body(ElementId),
    Handle(ElementId, Handle),
    Empty,
}

impl PointerTarget {
    pub fn element(&self) -> Option<ElementId> {
        match self {
            PointerTarget::Body(id) | PointerTarget::Handle(id, _) => Some(*id),
            PointerTarget::Empty => None,
        }
    }
}

/// Runs one gesture at a time against the canvas.
///
/// The engine changes element geometry live while the pointer moves and
/// hands back the history entry for the whole gesture when it ends.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    state: EditorState,
    momentum: Option<Momentum>,
    config: GestureConfig,
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            state: EditorState::Idle,
            momentum: None,
            config,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_gliding(&self) -> bool {
        self.momentum.is_some()
    }

    fn transition_to(&mut self, new_state: EditorState, event_bus: &EventBus) -> ValidationResult<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(ValidationError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        let old = std::mem::replace(&mut self.state, new_state);
        event_bus.emit(EditorEvent::StateChanged {
            old,
            new: self.state.clone(),
        });
        Ok(())
    }

    /// Start a gesture for a pointer press at `pointer` (screen space).
    ///
    /// Returns `Ok(false)` when the target does not support the gesture, such
    /// as a vertical handle on a line or an empty spot on the canvas. Fails if
    /// another gesture is running or the element is not mounted.
    pub fn begin(
        &mut self,
        target: PointerTarget,
        pointer: Pos2,
        canvas: &Canvas,
        event_bus: &EventBus,
    ) -> ValidationResult<bool> {
        let Some(id) = target.element() else {
            return Ok(false);
        };
        if !self.state.is_idle() {
            return Err(ValidationError::InvalidTransition {
                from: self.state.name(),
                to: match target {
                    PointerTarget::Handle(_, Handle::Rotate) => "Rotating",
                    PointerTarget::Handle(..) => "Resizing",
                    _ => "Dragging",
                },
            });
        }
        let element = canvas.element(id).ok_or(ValidationError::ElementNotFound(id))?;
        let binding = canvas.binding(id).ok_or(ValidationError::ElementNotFound(id))?;

        let next = match target {
            PointerTarget::Body(_) if binding.draggable => EditorState::Dragging {
                id,
                start_pointer: pointer,
                start_position: element.position,
                velocity: Vec2::ZERO,
                active: false,
            },
            PointerTarget::Handle(_, Handle::Resize(handle)) if binding.allows(handle) => EditorState::Resizing {
                id,
                handle,
                start_pointer: pointer,
                start: Box::new(element.clone()),
            },
            PointerTarget::Handle(_, Handle::Rotate) if binding.rotatable => EditorState::Rotating {
                id,
                start: Box::new(element.clone()),
            },
            _ => return Ok(false),
        };

        self.stop_glide();
        self.transition_to(next, event_bus)?;
        Ok(true)
    }

    /// Follow the pointer. Does nothing while idle.
    pub fn update(&mut self, pointer: Pos2, viewport: &Viewport, canvas: &mut Canvas, event_bus: &EventBus) {
        let page_size = canvas.size();
        match &mut self.state {
            EditorState::Idle => {}
            EditorState::Dragging {
                id,
                start_pointer,
                start_position,
                velocity,
                active,
            } => {
                let screen_delta = pointer - *start_pointer;
                if !*active {
                    let dead = self.config.drag_dead_zone;
                    if screen_delta.x.abs() <= dead && screen_delta.y.abs() <= dead {
                        return;
                    }
                    *active = true;
                }
                let Some(element) = canvas.element_mut(*id) else {
                    return;
                };
                let target = *start_position + viewport.screen_delta_to_page(screen_delta);
                let clamped = clamp_position(
                    element.anchor(),
                    target,
                    element.size,
                    page_size,
                    self.config.edge_margin,
                );
                *velocity = clamped - element.position;
                element.position = clamped;
                event_bus.emit(EditorEvent::ElementChanged { id: *id });
            }
            EditorState::Resizing {
                id,
                handle,
                start_pointer,
                start,
            } => {
                let Some(element) = canvas.element_mut(*id) else {
                    return;
                };
                let delta = viewport.screen_delta_to_page(pointer - *start_pointer);
                let rules = ResizeRules::for_element(start, &self.config, page_size);
                let rect = resize_rect(start.rect(), *handle, delta, &rules);
                element.set_rect(rect);
                event_bus.emit(EditorEvent::ElementChanged { id: *id });
            }
            EditorState::Rotating { id, .. } => {
                let Some(element) = canvas.element_mut(*id) else {
                    return;
                };
                let angle = rotation_from_pointer(element.center(), viewport.screen_to_page(pointer));
                element.set_rotation(angle);
                event_bus.emit(EditorEvent::ElementChanged { id: *id });
            }
        }
    }

    /// Finish the running gesture and return its history entry, if it changed anything.
    ///
    /// A press that never left the dead zone is a click and yields nothing.
    pub fn end(&mut self, canvas: &Canvas, event_bus: &EventBus) -> Option<HistoryAction> {
        let action = match &self.state {
            EditorState::Idle => return None,
            EditorState::Dragging {
                id,
                start_position,
                velocity,
                active,
                ..
            } => {
                let moved = canvas
                    .element(*id)
                    .map(|e| e.position)
                    .filter(|p| *active && p != start_position);
                if *active && Momentum::is_significant(*velocity, self.config.momentum_min_speed) {
                    self.momentum = Some(Momentum::new(
                        *id,
                        *velocity,
                        self.config.momentum_friction,
                        self.config.momentum_min_speed,
                    ));
                }
                moved.map(|new_position| HistoryAction::Move {
                    id: *id,
                    old_position: *start_position,
                    new_position,
                })
            }
            EditorState::Resizing { id, start, .. } | EditorState::Rotating { id, start } => canvas
                .element(*id)
                .filter(|current| *current != start.as_ref())
                .map(|current| HistoryAction::StyleUpdate {
                    old: start.as_ref().clone(),
                    new: current.clone(),
                }),
        };

        if let Err(err) = self.transition_to(EditorState::Idle, event_bus) {
            log::warn!("gesture end: {}", err);
        }
        action
    }

    /// Abandon the running gesture, putting the element back where it started
    pub fn cancel(&mut self, canvas: &mut Canvas, event_bus: &EventBus) {
        match &self.state {
            EditorState::Idle => return,
            EditorState::Dragging { id, start_position, .. } => {
                if let Some(element) = canvas.element_mut(*id) {
                    element.position = *start_position;
                }
            }
            EditorState::Resizing { id, start, .. } | EditorState::Rotating { id, start } => {
                if let Some(element) = canvas.element_mut(*id) {
                    *element = start.as_ref().clone();
                }
            }
        }
        if let Some(id) = self.state.target() {
            event_bus.emit(EditorEvent::ElementChanged { id });
        }
        self.stop_glide();
        if let Err(err) = self.transition_to(EditorState::Idle, event_bus) {
            log::warn!("gesture cancel: {}", err);
        }
    }

    /// Advance a released drag's glide by one frame. Returns true while it keeps moving.
    pub fn step_glide(&mut self, canvas: &mut Canvas, event_bus: &EventBus) -> bool {
        let Some(momentum) = self.momentum.as_mut() else {
            return false;
        };
        let id = momentum.id();
        let page_size = canvas.size();
        let (Some(delta), Some(element)) = (momentum.step(), canvas.element_mut(id)) else {
            self.momentum = None;
            return false;
        };
        let clamped = clamp_position(
            element.anchor(),
            element.position + delta,
            element.size,
            page_size,
            self.config.edge_margin,
        );
        element.position = clamped;
        event_bus.emit(EditorEvent::ElementChanged { id });
        true
    }

    pub fn stop_glide(&mut self) {
        self.momentum = None;
    }
}
