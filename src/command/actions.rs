use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, CommandResult};
use crate::element::{Element, ElementId};
use crate::event::EditorEvent;
use crate::page::Background;

/// A reversible record of one user-visible change.
///
/// Each variant carries enough data to be applied in either direction without
/// looking at anything but the canvas.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryAction {
    /// An element was created at `index` in the canvas list
    Add { element: Element, index: usize },
    /// An element was deleted from `index`
    Remove { element: Element, index: usize },
    /// A completed drag
    Move {
        id: ElementId,
        old_position: Pos2,
        new_position: Pos2,
    },
    /// Any attribute change: style, text, resize, rotation, z-order
    StyleUpdate { old: Element, new: Element },
    /// Page background replaced
    Background { old: Background, new: Background },
    /// Z-index changes of one or two elements from a single reorder command,
    /// as `(id, old_z, new_z)`
    Restack { changes: Vec<(ElementId, i32, i32)> },
}

impl std::fmt::Debug for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryAction::Add { element, index } => f
                .debug_struct("Add")
                .field("id", &element.id)
                .field("kind", &element.kind())
                .field("index", index)
                .finish(),
            HistoryAction::Remove { element, index } => f
                .debug_struct("Remove")
                .field("id", &element.id)
                .field("kind", &element.kind())
                .field("index", index)
                .finish(),
            HistoryAction::Move {
                id,
                old_position,
                new_position,
            } => f
                .debug_struct("Move")
                .field("id", id)
                .field("old_position", old_position)
                .field("new_position", new_position)
                .finish(),
            HistoryAction::StyleUpdate { old, .. } => {
                f.debug_struct("StyleUpdate").field("id", &old.id).finish()
            }
            HistoryAction::Background { old, new } => f
                .debug_struct("Background")
                .field("old_has_image", &old.has_image())
                .field("new_has_image", &new.has_image())
                .finish(),
            HistoryAction::Restack { changes } => f.debug_struct("Restack").field("changes", changes).finish(),
        }
    }
}

impl HistoryAction {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryAction::Add { .. } => "add",
            HistoryAction::Remove { .. } => "remove",
            HistoryAction::Move { .. } => "move",
            HistoryAction::StyleUpdate { .. } => "update",
            HistoryAction::Background { .. } => "background",
            HistoryAction::Restack { .. } => "update",
        }
    }

    /// Element the action is about, if any
    pub fn target(&self) -> Option<ElementId> {
        match self {
            HistoryAction::Add { element, .. } | HistoryAction::Remove { element, .. } => Some(element.id),
            HistoryAction::Move { id, .. } => Some(*id),
            HistoryAction::StyleUpdate { old, .. } => Some(old.id),
            HistoryAction::Restack { changes } => changes.first().map(|(id, _, _)| *id),
            HistoryAction::Background { .. } => None,
        }
    }

    /// Apply the forward effect
    pub fn apply(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            HistoryAction::Add { element, index } => insert(ctx, *index, element),
            HistoryAction::Remove { element, .. } => remove(ctx, element.id),
            HistoryAction::Move { id, new_position, .. } => set_position(ctx, *id, *new_position),
            HistoryAction::StyleUpdate { new, .. } => replace(ctx, new),
            HistoryAction::Background { new, .. } => set_background(ctx, new),
            HistoryAction::Restack { changes } => {
                restack(ctx, changes.iter().map(|(id, _, new_z)| (*id, *new_z)))
            }
        }
    }

    /// Apply the inverse effect
    pub fn revert(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            HistoryAction::Add { element, .. } => remove(ctx, element.id),
            HistoryAction::Remove { element, index } => insert(ctx, *index, element),
            HistoryAction::Move { id, old_position, .. } => set_position(ctx, *id, *old_position),
            HistoryAction::StyleUpdate { old, .. } => replace(ctx, old),
            HistoryAction::Background { old, .. } => set_background(ctx, old),
            HistoryAction::Restack { changes } => {
                restack(ctx, changes.iter().map(|(id, old_z, _)| (*id, *old_z)))
            }
        }
    }

    /// Fold a later update of the same element (or of the background) into
    /// this one, keeping the original `old` state. Returns false if the two
    /// cannot be merged.
    pub fn absorb(&mut self, later: &HistoryAction) -> bool {
        match (self, later) {
            (HistoryAction::StyleUpdate { old, new }, HistoryAction::StyleUpdate { old: later_old, new: later_new })
                if old.id == later_old.id && new == later_old =>
            {
                *new = later_new.clone();
                true
            }
            (HistoryAction::Background { new, .. }, HistoryAction::Background { old: later_old, new: later_new })
                if new == later_old =>
            {
                *new = later_new.clone();
                true
            }
            _ => false,
        }
    }
}

fn insert(ctx: &mut CommandContext<'_>, index: usize, element: &Element) -> CommandResult {
    if ctx.canvas.element(element.id).is_some() {
        return Err(CommandError::AlreadyPresent(element.id));
    }
    let id = ctx.canvas.insert_at(index, element.clone());
    ctx.event_bus.emit(EditorEvent::ElementAdded { id });
    Ok(())
}

fn remove(ctx: &mut CommandContext<'_>, id: ElementId) -> CommandResult {
    ctx.canvas.remove(id).ok_or(CommandError::TargetMissing(id))?;
    ctx.event_bus.emit(EditorEvent::ElementRemoved { id });
    Ok(())
}

fn set_position(ctx: &mut CommandContext<'_>, id: ElementId, position: Pos2) -> CommandResult {
    let element = ctx.canvas.element_mut(id).ok_or(CommandError::TargetMissing(id))?;
    element.position = position;
    ctx.event_bus.emit(EditorEvent::ElementChanged { id });
    Ok(())
}

fn replace(ctx: &mut CommandContext<'_>, state: &Element) -> CommandResult {
    let id = state.id;
    let element = ctx.canvas.element_mut(id).ok_or(CommandError::TargetMissing(id))?;
    *element = state.clone();
    ctx.canvas.mount(id);
    ctx.event_bus.emit(EditorEvent::ElementChanged { id });
    Ok(())
}

fn set_background(ctx: &mut CommandContext<'_>, background: &Background) -> CommandResult {
    ctx.canvas.set_background(background.clone());
    ctx.event_bus.emit(EditorEvent::BackgroundChanged);
    Ok(())
}

fn restack(ctx: &mut CommandContext<'_>, targets: impl Iterator<Item = (ElementId, i32)>) -> CommandResult {
    for (id, z_index) in targets {
        let element = ctx.canvas.element_mut(id).ok_or(CommandError::TargetMissing(id))?;
        element.z_index = z_index;
        ctx.event_bus.emit(EditorEvent::ElementChanged { id });
    }
    Ok(())
}
