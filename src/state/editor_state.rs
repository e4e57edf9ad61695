/// The pointer-gesture state machine of the design editor.
///
/// At most one gesture runs at a time. Every gesture starts from `Idle` and
/// ends by returning to it; there are no direct transitions between gestures.
///
/// # State Transitions
///
/// ```text
///                    ┌─────────────┐
///              ┌─────►  Dragging   ├─────┐
///              │     └─────────────┘     │
///              │                         │
/// ┌──────────┐ │     ┌─────────────┐     │ ┌──────────┐
/// │   Idle   ├─┼─────►  Resizing   ├─────┼─►   Idle   │
/// └──────────┘ │     └─────────────┘     │ └──────────┘
///              │                         │
///              │     ┌─────────────┐     │
///              └─────►  Rotating   ├─────┘
///                    └─────────────┘
/// ```
///
/// A drag is entered on pointer-down over an element body but does not move
/// anything until the pointer leaves the dead zone; `active` records that.
use egui::{Pos2, Vec2};

use crate::element::{Element, ElementId};
use crate::widgets::resize_handle::HandlePosition;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    /// No active gesture
    Idle,
    Dragging {
        id: ElementId,
        /// Pointer position at press, in screen coordinates
        start_pointer: Pos2,
        /// Element position at press
        start_position: Pos2,
        /// Last page-space displacement between two moves, used for momentum
        velocity: Vec2,
        /// False until the pointer has left the dead zone
        active: bool,
    },
    Resizing {
        id: ElementId,
        handle: HandlePosition,
        start_pointer: Pos2,
        /// Element as it was at press
        start: Box<Element>,
    },
    Rotating {
        id: ElementId,
        start: Box<Element>,
    },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // Gestures only start from Idle
            (EditorState::Idle, _) => true,
            // and only end by going back to it
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, EditorState::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, EditorState::Resizing { .. })
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, EditorState::Rotating { .. })
    }

    /// Element the running gesture acts on
    pub fn target(&self) -> Option<ElementId> {
        match self {
            EditorState::Idle => None,
            EditorState::Dragging { id, .. }
            | EditorState::Resizing { id, .. }
            | EditorState::Rotating { id, .. } => Some(*id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Dragging { .. } => "Dragging",
            EditorState::Resizing { .. } => "Resizing",
            EditorState::Rotating { .. } => "Rotating",
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dragging() -> EditorState {
        EditorState::Dragging {
            id: ElementId::new(),
            start_pointer: Pos2::ZERO,
            start_position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            active: false,
        }
    }

    #[test]
    fn gestures_start_and_end_at_idle() {
        let idle = EditorState::Idle;
        let drag = dragging();
        assert!(idle.can_transition_to(&drag));
        assert!(drag.can_transition_to(&idle));
        assert!(!drag.can_transition_to(&dragging()));
    }

    #[test]
    fn target_follows_gesture() {
        assert_eq!(EditorState::Idle.target(), None);
        assert!(dragging().target().is_some());
        assert!(dragging().is_dragging());
        assert_eq!(dragging().name(), "Dragging");
    }
}
