//! Append-only loyalty ledger rows.

use super::{CustomerId, OrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

record_id!(
    /// Type-safe identifier for LoyaltyTransactions.
    LoyaltyTransactionId,
    "loyalty_tx"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoyaltyKind {
    Earn,
    Redeem,
}

impl LoyaltyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LoyaltyKind::Earn => "earn",
            LoyaltyKind::Redeem => "redeem",
        }
    }

    /// The balance delta for `points` of this kind.
    pub fn signed(self, points: i64) -> i64 {
        match self {
            LoyaltyKind::Earn => points,
            LoyaltyKind::Redeem => -points,
        }
    }
}

impl fmt::Display for LoyaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point movement for one order. At most one row of each kind exists per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyTransaction {
    pub id: LoyaltyTransactionId,
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub kind: LoyaltyKind,
    /// Always positive; the sign comes from `kind`.
    pub points: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LoyaltyTransaction {
    /// Idempotency key: `earn:{order}` or `redeem:{order}`.
    pub fn key_for(kind: LoyaltyKind, order_id: OrderId) -> String {
        format!("{}:{}", kind.as_str(), order_id.0)
    }

    pub fn key(&self) -> String {
        Self::key_for(self.kind, self.order_id)
    }

    pub fn signed_points(&self) -> i64 {
        self.kind.signed(self.points)
    }
}

/// Payload for appending a loyalty transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyTransactionCreate {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub kind: LoyaltyKind,
    pub points: i64,
    pub description: String,
}
