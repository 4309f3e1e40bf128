//! Error types for the Order actor.

use crate::model::{Money, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Orders can only be inserted as new, confirmed, preparing or completed.
    #[error("Orders cannot start in status {0}")]
    InvalidInitialStatus(OrderStatus),

    #[error("Items of order {0} can no longer change (status {1})")]
    ItemsLocked(String, OrderStatus),

    #[error("Order {0} is closed (status {1})")]
    Closed(String, OrderStatus),

    #[error("Order line not found: {0}")]
    LineNotFound(u32),

    #[error("Invalid quantity for {0}")]
    InvalidQuantity(String),

    #[error("Order amounts out of range")]
    AmountOutOfRange,

    #[error("Order total would be negative: {0}")]
    NegativeTotal(Money),

    #[error("Order {0} has no payment method")]
    MissingPayment(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
