//! # Cash Movement Actor
//!
//! Append-only store of [`CashMovement`] rows. Sale income rows carry the order id and use
//! `sale:{order}` as their unique key, so the store holds at most one income row per
//! order no matter how many times recording is retried.

pub mod error;

pub use error::*;

use crate::clients::CashMovementClient;
use crate::model::{CashMovement, CashMovementCreate, CashMovementId, MovementKind};
use async_trait::async_trait;
use chrono::Utc;
use record_store::{ActorEntity, ResourceActor};
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for CashMovement {
    type Id = CashMovementId;
    type Create = CashMovementCreate;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = CashError;

    fn from_create_params(
        id: CashMovementId,
        params: CashMovementCreate,
    ) -> Result<Self, Self::Error> {
        if params.amount.is_negative() {
            return Err(CashError::InvalidAmount(params.amount));
        }
        if params.category.trim().is_empty() {
            return Err(CashError::ValidationError("category is required".into()));
        }
        Ok(Self {
            id,
            kind: params.kind,
            category: params.category,
            amount: params.amount,
            payment_method: params.payment_method,
            description: params.description,
            movement_date: Utc::now(),
            order_id: params.order_id,
        })
    }

    fn unique_key(&self) -> Option<String> {
        match (self.kind, self.order_id) {
            (MovementKind::Income, Some(order_id)) => Some(CashMovement::sale_key(order_id)),
            _ => None,
        }
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

/// Creates a new CashMovement actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<CashMovement>, CashMovementClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CashMovementClient::new(generic_client))
}
