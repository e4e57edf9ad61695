mod actions;
mod context;
mod history;

use thiserror::Error;

use crate::element::ElementId;

pub use actions::HistoryAction;
pub use context::CommandContext;
pub use history::CommandHistory;

/// Result type for applying history actions
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Errors that can occur while applying a history action
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The element an action refers to is not on the canvas
    #[error("Element {0} is not on the canvas")]
    TargetMissing(ElementId),
    /// The element to re-create is already on the canvas
    #[error("Element {0} is already on the canvas")]
    AlreadyPresent(ElementId),
}
