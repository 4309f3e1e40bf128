//! # Table Actor
//!
//! Dine-in seating. A table is occupied by exactly one open tab at a time; the table
//! number is the unique key.

pub mod error;

pub use error::*;

use crate::clients::TableClient;
use crate::model::{OrderId, Table, TableCreate, TableId, TableStatus};
use async_trait::async_trait;
use record_store::{ActorEntity, ResourceActor};
use std::convert::Infallible;

#[derive(Debug, Clone)]
pub enum TableAction {
    /// Seat a tab. Re-occupying with the same order is a no-op.
    Occupy(OrderId),
    /// Release the table. Freeing a free table is a no-op.
    Free,
}

#[async_trait]
impl ActorEntity for Table {
    type Id = TableId;
    type Create = TableCreate;
    type Update = Infallible;
    type Action = TableAction;
    type ActionResult = Table;
    type Context = ();
    type Error = TableError;

    fn from_create_params(id: TableId, params: TableCreate) -> Result<Self, Self::Error> {
        if params.number == 0 {
            return Err(TableError::InvalidNumber(params.number));
        }
        Ok(Self {
            id,
            number: params.number,
            status: TableStatus::Free,
            order_id: None,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.number.to_string())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: TableAction, _ctx: &()) -> Result<Table, Self::Error> {
        match action {
            TableAction::Occupy(order_id) => match (self.status, self.order_id) {
                (TableStatus::Occupied, Some(current)) if current == order_id => {}
                (TableStatus::Occupied, _) => {
                    return Err(TableError::AlreadyOccupied(self.number));
                }
                (TableStatus::Free, _) => {
                    self.status = TableStatus::Occupied;
                    self.order_id = Some(order_id);
                }
            },
            TableAction::Free => {
                self.status = TableStatus::Free;
                self.order_id = None;
            }
        }
        Ok(self.clone())
    }
}

/// Creates a new Table actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Table>, TableClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, TableClient::new(generic_client))
}
