//! Error types for the Courier actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CourierError {
    #[error("Courier not found: {0}")]
    NotFound(String),

    #[error("Courier validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CourierError {
    fn from(msg: String) -> Self {
        CourierError::ActorCommunicationError(msg)
    }
}
