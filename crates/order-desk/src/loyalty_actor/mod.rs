//! # Loyalty Transaction Actor
//!
//! Append-only store of [`LoyaltyTransaction`] rows. Rows can be created and read but
//! never updated: both `Update` and `Action` are [`Infallible`], so no such request can
//! even be built.
//!
//! The `{kind}:{order}` unique key makes a second earn (or redeem) row for the same order
//! impossible. Only the customer actor appends here, as part of applying the points to the
//! balance.

pub mod error;

pub use error::*;

use crate::clients::LoyaltyTransactionClient;
use crate::model::{
    LoyaltyTransaction, LoyaltyTransactionCreate, LoyaltyTransactionId,
};
use async_trait::async_trait;
use chrono::Utc;
use record_store::{ActorEntity, ResourceActor};
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for LoyaltyTransaction {
    type Id = LoyaltyTransactionId;
    type Create = LoyaltyTransactionCreate;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = LoyaltyError;

    fn from_create_params(
        id: LoyaltyTransactionId,
        params: LoyaltyTransactionCreate,
    ) -> Result<Self, Self::Error> {
        if params.points <= 0 {
            return Err(LoyaltyError::InvalidPoints(params.points));
        }
        Ok(Self {
            id,
            customer_id: params.customer_id,
            order_id: params.order_id,
            kind: params.kind,
            points: params.points,
            description: params.description,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.key())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

/// Creates a new LoyaltyTransaction actor and its client.
pub fn new(
    buffer_size: usize,
) -> (ResourceActor<LoyaltyTransaction>, LoyaltyTransactionClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, LoyaltyTransactionClient::new(generic_client))
}
