//! Error types for document model operations

use markup_tree::{ElementId, MarkupError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    /// The cursor is not a direct child slot of the container's own element,
    /// or it went stale. Nothing was changed.
    #[error("Invalid cursor position: expected a child slot of {container}")]
    InvalidCursorPosition { container: ElementId },

    #[error("Index out of range: {index} (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Node not found: {0}")]
    NodeNotFound(ElementId),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
