//! Error types for the Customer actor.

use crate::loyalty_actor::LoyaltyError;
use thiserror::Error;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// The requested customer was not found.
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// Another customer already owns this phone number.
    #[error("Phone number already registered: {0}")]
    DuplicatePhone(String),

    #[error("Phone number is required")]
    EmptyPhone,

    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: i64 },

    /// The ledger row for this key belongs to another customer.
    #[error("Loyalty transaction {0} belongs to another customer")]
    ForeignTransaction(String),

    /// Appending to the loyalty ledger failed.
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CustomerError {
    fn from(msg: String) -> Self {
        CustomerError::ActorCommunicationError(msg)
    }
}
