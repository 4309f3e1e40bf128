//! # ActorEntity Trait
//!
//! The contract every record type (Customer, Order, CashMovement, ...) implements to be
//! stored by the generic [`ResourceActor`](crate::ResourceActor). Associated types pin the
//! id, the create/update DTOs, the custom actions and the error type, so a `CustomerCreate`
//! can never be sent to the order store.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs after construction and before the row is inserted.
//! - [`ActorEntity::unique_key`] declares the natural key the store must keep unique.
//!
//! Hooks run against a scratch copy of the row. The store only commits the copy when the
//! hook succeeds, which makes every create, update and action atomic for a single row.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may call other actors. The `Context` associated type
/// is injected into every hook when the actor is started (`run(context)`), which lets
/// records depend on clients created after the actor itself ("late binding").
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The identifier assigned by the store. Built from a monotonic `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new row.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing row.
    type Update: Send + Sync + Debug;

    /// Record-specific operations beyond create/read/update.
    type Action: Send + Sync + Debug;

    /// Result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into hooks. Use `()` if none are needed.
    type Context: Send + Sync;

    /// One error enum per record type, shared by every hook.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the full row from the store-assigned id and the create payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Natural key that must be unique across all rows of this type.
    ///
    /// `None` means the row does not take part in the uniqueness index.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after `from_create_params` and before the row is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update payload.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
