//! Dine-in seating.

use super::OrderId;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Tables.
    TableId,
    "table"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Free,
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    /// The number painted on the table; unique.
    pub number: u32,
    pub status: TableStatus,
    /// The open tab seated here.
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone)]
pub struct TableCreate {
    pub number: u32,
}
