//! Error types for the Table actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Table {0} is already occupied")]
    AlreadyOccupied(u32),

    #[error("Table number {0} is already registered")]
    DuplicateNumber(String),

    #[error("Invalid table number: {0}")]
    InvalidNumber(u32),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for TableError {
    fn from(msg: String) -> Self {
        TableError::ActorCommunicationError(msg)
    }
}
