use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::element::{ElementId, ElementKind};

/// Which property panel is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    NoSelection,
    Text,
    Shape,
    Media,
}

impl PanelKind {
    pub fn for_kind(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => PanelKind::Text,
            ElementKind::Shape => PanelKind::Shape,
            ElementKind::Media => PanelKind::Media,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::NoSelection => "No element selected",
            PanelKind::Text => "Text Properties",
            PanelKind::Shape => "Shape Properties",
            PanelKind::Media => "Media Properties",
        }
    }
}

/// The single selected element, plus whether its text is being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ElementId>,
    editing_text: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Select `id`, returning the previous selection. Editing ends whenever the target changes.
    pub fn select(&mut self, id: ElementId) -> Option<ElementId> {
        let old = self.selected.replace(id);
        if old != Some(id) {
            self.editing_text = false;
        }
        old
    }

    pub fn clear(&mut self) -> Option<ElementId> {
        self.editing_text = false;
        self.selected.take()
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text
    }

    /// The element whose text is being typed into, if any
    pub fn editing(&self) -> Option<ElementId> {
        self.selected.filter(|_| self.editing_text)
    }

    pub(crate) fn set_editing_text(&mut self, editing: bool) {
        self.editing_text = editing && self.selected.is_some();
    }

    /// Panel for the current selection. A selection that vanished from the canvas shows none.
    pub fn panel(&self, canvas: &Canvas) -> PanelKind {
        self.selected
            .and_then(|id| canvas.element(id))
            .map_or(PanelKind::NoSelection, |e| PanelKind::for_kind(e.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_other_element_ends_editing() {
        let a = ElementId::new();
        let b = ElementId::new();
        let mut selection = Selection::new();
        assert_eq!(selection.select(a), None);
        selection.set_editing_text(true);
        assert_eq!(selection.editing(), Some(a));

        selection.select(a);
        assert!(selection.is_editing_text());

        assert_eq!(selection.select(b), Some(a));
        assert!(!selection.is_editing_text());
    }

    #[test]
    fn editing_requires_selection() {
        let mut selection = Selection::new();
        selection.set_editing_text(true);
        assert!(!selection.is_editing_text());
    }
}
