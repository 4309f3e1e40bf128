//! Append-only cash-drawer movements. This ledger is the reporting source of truth.

use super::{Money, OrderId, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for CashMovements.
    CashMovementId,
    "cash_movement"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Income,
    Expense,
}

/// Category used for the income row of a completed sale.
pub const SALE_CATEGORY: &str = "sale";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: CashMovementId,
    pub kind: MovementKind,
    pub category: String,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub description: String,
    pub movement_date: DateTime<Utc>,
    /// Set for sale income; the store keeps one such row per order.
    pub order_id: Option<OrderId>,
}

impl CashMovement {
    pub fn sale_key(order_id: OrderId) -> String {
        format!("sale:{}", order_id.0)
    }
}

/// Payload for recording a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct CashMovementCreate {
    pub kind: MovementKind,
    pub category: String,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub description: String,
    pub order_id: Option<OrderId>,
}
