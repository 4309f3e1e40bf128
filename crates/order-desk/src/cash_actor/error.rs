//! Error types for the CashMovement actor.

use crate::model::Money;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CashError {
    #[error("Cash movement not found: {0}")]
    NotFound(String),

    /// The order already has its income row.
    #[error("Cash movement already recorded: {0}")]
    Duplicate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    #[error("Cash validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CashError {
    fn from(msg: String) -> Self {
        CashError::ActorCommunicationError(msg)
    }
}
