//! # Ledger Writers
//!
//! The two recorders a completed order feeds: [`LoyaltyLedger`] (points and the
//! customer's running balance) and [`CashLedger`] (drawer movements).
//!
//! Both are idempotent per order. Their rows carry store unique keys derived from the
//! order id (`earn:{id}`, `sale:{id}`), so a retry after a partial failure finds the
//! existing row instead of writing a second one. That is what lets reconciliation re-run
//! them blindly.

mod cash;
mod loyalty;

pub use cash::CashLedger;
pub use loyalty::{LoyaltyAudit, LoyaltyLedger};

use crate::cash_actor::CashError;
use crate::customer_actor::CustomerError;
use crate::loyalty_actor::LoyaltyError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    #[error(transparent)]
    Cash(#[from] CashError),

    #[error("Order {0} is not completed")]
    NotCompleted(String),

    #[error("Order {0} has no payment method")]
    MissingPayment(String),

    #[error("Order {0} does not belong to this customer")]
    CustomerMismatch(String),
}
