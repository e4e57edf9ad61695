use thiserror::Error;

use crate::element::ElementId;
use crate::page::PageId;

/// Rejected user input. Returned before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Canvas size must be between {min} and {max} pixels (got {width}×{height})")]
    CanvasSizeOutOfRange {
        width: f32,
        height: f32,
        min: f32,
        max: f32,
    },

    #[error("Page name cannot be empty")]
    EmptyPageName,

    #[error("A page with this name already exists")]
    DuplicatePageName(String),

    #[error("Page {0} not found")]
    PageNotFound(PageId),

    #[error("Element {0} not found")]
    ElementNotFound(ElementId),

    #[error("Element {0} is being edited")]
    ElementBeingEdited(ElementId),

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
