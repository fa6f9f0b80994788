//! Core error types for Shelfpick.

use thiserror::Error;

use crate::board::BoardAction;
use crate::models::BookStatus;

/// Core error type for Shelfpick operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown discovery source or search target name.
    #[error("Unknown value: {0}")]
    UnknownValue(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Board error.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Rejected board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// No collection holds a book with this id.
    #[error("Book not on the board: {0}")]
    NotFound(String),

    /// The transition table has no row for this stage/action pair.
    #[error("Cannot {action} a book in {from}")]
    IllegalTransition {
        /// Stage the book is currently in.
        from: BookStatus,
        /// Requested action.
        action: BoardAction,
    },
}
