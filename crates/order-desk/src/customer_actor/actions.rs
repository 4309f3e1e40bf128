//! Custom actions for the Customer actor.

use crate::model::{Customer, LoyaltyKind, LoyaltyTransaction, OrderId};

/// A loyalty movement to append and fold into the balance as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyEntry {
    pub order_id: OrderId,
    pub kind: LoyaltyKind,
    /// Positive; the sign comes from `kind`.
    pub points: i64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub enum CustomerAction {
    /// Append the ledger row (unless it exists) and apply it to the balance (unless
    /// already applied).
    ///
    /// # Errors
    /// Fails with `InsufficientPoints` when a redemption would make the balance negative.
    ApplyLoyalty(LoyaltyEntry),
    MarkSuspicious { reason: String },
    ClearSuspicious,
}

/// Outcome of [`CustomerAction::ApplyLoyalty`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyApplied {
    pub transaction: LoyaltyTransaction,
    pub balance: i64,
    /// `false` when the transaction had already been applied by an earlier attempt.
    pub newly_applied: bool,
}

/// Results from CustomerActions - variants match 1:1 with CustomerAction
#[derive(Debug, Clone)]
pub enum CustomerActionResult {
    ApplyLoyalty(LoyaltyApplied),
    MarkSuspicious(Customer),
    ClearSuspicious(Customer),
}
