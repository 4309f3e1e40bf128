//! A customer identified by phone number.
//!
//! # Record Store
//! `Customer` implements [`ActorEntity`](record_store::ActorEntity) in
//! [`customer_actor`](crate::customer_actor). The phone is the row's unique key, so the
//! store itself refuses a second customer with the same number.
//!
//! The loyalty balance is never written directly: it only moves through
//! [`CustomerAction::ApplyLoyalty`](crate::customer_actor::CustomerAction::ApplyLoyalty),
//! which also appends the matching ledger row.
use super::LoyaltyTransactionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

record_id!(
    /// Type-safe identifier for Customers.
    CustomerId,
    "customer"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub phone: String,
    pub name: String,
    /// Tax id. Required to earn loyalty points.
    pub cpf: Option<String>,
    pub loyalty_points: i64,
    pub is_suspicious: bool,
    pub suspicious_reason: Option<String>,
    /// Ledger rows already folded into `loyalty_points`.
    pub applied_transactions: BTreeSet<LoyaltyTransactionId>,
}

impl Customer {
    pub fn new(id: CustomerId, phone: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            phone: phone.into(),
            name: name.into(),
            cpf: None,
            loyalty_points: 0,
            is_suspicious: false,
            suspicious_reason: None,
            applied_transactions: BTreeSet::new(),
        }
    }

    pub fn has_tax_id(&self) -> bool {
        self.cpf.as_deref().is_some_and(|cpf| !cpf.trim().is_empty())
    }

    /// The advisory shown to the operator before checkout, if any.
    pub fn warning(&self) -> Option<String> {
        self.is_suspicious.then(|| {
            self.suspicious_reason
                .clone()
                .unwrap_or_else(|| "flagged as suspicious".to_string())
        })
    }
}

/// Payload for creating a new customer.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub phone: String,
    pub name: String,
    pub cpf: Option<String>,
}

/// Corrections supplied by a later sale. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub cpf: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cpf.is_none()
    }
}
