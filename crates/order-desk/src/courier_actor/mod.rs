//! # Courier Actor
//!
//! Delivery couriers. The desk only reads them; updates come from staff administration.

pub mod error;

pub use error::*;

use crate::clients::CourierClient;
use crate::model::{Courier, CourierCreate, CourierId, CourierUpdate};
use async_trait::async_trait;
use record_store::{ActorEntity, ResourceActor};
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Courier {
    type Id = CourierId;
    type Create = CourierCreate;
    type Update = CourierUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = CourierError;

    fn from_create_params(id: CourierId, params: CourierCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(CourierError::ValidationError("name is required".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            phone: params.phone,
            is_active: true,
        })
    }

    async fn on_update(&mut self, update: CourierUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

/// Creates a new Courier actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Courier>, CourierClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CourierClient::new(generic_client))
}
