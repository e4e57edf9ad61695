use egui::Vec2;

use crate::element::ElementId;
use crate::page::PageId;
use crate::state::EditorState;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ElementAdded { id: ElementId },
    ElementRemoved { id: ElementId },
    ElementChanged { id: ElementId },
    SelectionChanged {
        old: Option<ElementId>,
        new: Option<ElementId>,
    },
    StateChanged {
        old: EditorState,
        new: EditorState,
    },
    BackgroundChanged,
    CanvasResized { size: Vec2 },
    ZoomChanged { zoom: f32 },
    PageAdded { id: PageId },
    PageSwitched { id: PageId },
    PageDeleted { id: PageId },
    PageRenamed { id: PageId },
    HistoryChanged { can_undo: bool, can_redo: bool },
    SessionSaved,
    SessionRestored,
}

impl EditorEvent {
    /// Events that change what would be written to storage
    pub fn marks_dirty(&self) -> bool {
        matches!(
            self,
            EditorEvent::ElementAdded { .. }
                | EditorEvent::ElementRemoved { .. }
                | EditorEvent::ElementChanged { .. }
                | EditorEvent::BackgroundChanged
                | EditorEvent::CanvasResized { .. }
                | EditorEvent::PageAdded { .. }
                | EditorEvent::PageSwitched { .. }
                | EditorEvent::PageDeleted { .. }
                | EditorEvent::PageRenamed { .. }
        )
    }
}
