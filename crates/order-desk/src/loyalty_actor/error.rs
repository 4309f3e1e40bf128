//! Error types for the LoyaltyTransaction actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoyaltyError {
    #[error("Loyalty transaction not found: {0}")]
    NotFound(String),

    /// A row with the same `{kind}:{order}` key already exists.
    #[error("Loyalty transaction already recorded: {0}")]
    Duplicate(String),

    #[error("Loyalty points must be positive, got {0}")]
    InvalidPoints(i64),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for LoyaltyError {
    fn from(msg: String) -> Self {
        LoyaltyError::ActorCommunicationError(msg)
    }
}
