//! Checkout error taxonomy.
//!
//! Only the first two stages of a sale can fail it: validation (nothing written yet) and
//! persisting the order row. Everything after the order exists is a side effect and is
//! reported as a [`SideEffectWarning`] instead.

use crate::cart::CartError;
use crate::customer_actor::CustomerError;
use crate::kiosk::KioskError;
use crate::model::{OrderId, SideEffect};
use crate::order_actor::OrderError;
use crate::ports::CatalogError;
use crate::table_actor::TableError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// Rejected before anything was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The store could not be reached. Safe to retry.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// The order or table is not in a state that allows the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The order row was written but could not be read back. Retrying would place it
    /// twice; reconciliation picks up its pending steps.
    #[error("Order {order_id} was saved but could not be loaded: {reason}")]
    Unconfirmed { order_id: OrderId, reason: String },
}

impl CheckoutError {
    /// Whether the order exists despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, CheckoutError::Unconfirmed { .. })
    }
}

impl From<OrderError> for CheckoutError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::ActorCommunicationError(_) => CheckoutError::Persistence(e.to_string()),
            OrderError::ValidationError(_)
            | OrderError::InvalidQuantity(_)
            | OrderError::AmountOutOfRange
            | OrderError::NegativeTotal(_)
            | OrderError::MissingPayment(_) => CheckoutError::Validation(e.to_string()),
            _ => CheckoutError::InvalidState(e.to_string()),
        }
    }
}

impl From<CustomerError> for CheckoutError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::ActorCommunicationError(_) => CheckoutError::Persistence(e.to_string()),
            _ => CheckoutError::Validation(e.to_string()),
        }
    }
}

impl From<TableError> for CheckoutError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::ActorCommunicationError(_) => CheckoutError::Persistence(e.to_string()),
            TableError::NotFound(_) | TableError::AlreadyOccupied(_) => {
                CheckoutError::InvalidState(e.to_string())
            }
            _ => CheckoutError::Validation(e.to_string()),
        }
    }
}

impl From<CartError> for CheckoutError {
    fn from(e: CartError) -> Self {
        CheckoutError::Validation(e.to_string())
    }
}

impl From<KioskError> for CheckoutError {
    fn from(e: KioskError) -> Self {
        match e {
            KioskError::CheckoutInProgress => CheckoutError::InvalidState(e.to_string()),
            KioskError::Cart(cart) => cart.into(),
        }
    }
}

impl From<CatalogError> for CheckoutError {
    fn from(e: CatalogError) -> Self {
        CheckoutError::Validation(e.to_string())
    }
}

/// A side effect that failed after the order was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SideEffectWarning {
    pub effect: SideEffect,
    pub reason: String,
}

impl SideEffectWarning {
    pub fn new(effect: SideEffect, reason: impl ToString) -> Self {
        Self {
            effect,
            reason: reason.to_string(),
        }
    }
}
