//! Delivery couriers (motoboys). Notified by the desk, never mutated by it.

use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Couriers.
    CourierId,
    "courier"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    pub id: CourierId,
    pub name: String,
    /// Messaging contact. A courier without one cannot be notified.
    pub phone: Option<String>,
    pub is_active: bool,
}

impl Courier {
    /// The contact to message, if it is usable.
    pub fn contact(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct CourierCreate {
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CourierUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
