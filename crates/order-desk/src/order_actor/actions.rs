//! Custom actions for the Order actor.
//!
//! Every action returns the order as committed, so callers never need a second read to
//! see the recomputed totals.

use crate::model::{NewOrderItem, OrderStatus, PaymentMethod, SideEffect};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Move forward to an intermediate status (`Confirmed` .. `ReadyForPayment`).
    Transition(OrderStatus),
    /// Append lines to an open order.
    AddItems(Vec<NewOrderItem>),
    /// Set a line's quantity; `0` removes it.
    UpdateItemQuantity { line_id: u32, quantity: u32 },
    UpdateItemNotes { line_id: u32, notes: Option<String> },
    /// Complete the sale. `payment_method` overrides the one chosen at checkout.
    Complete {
        payment_method: Option<PaymentMethod>,
        effects: BTreeSet<SideEffect>,
    },
    Cancel,
    /// Mark a follow-up step as done. Clearing an absent marker is a no-op.
    ClearEffect(SideEffect),
}
