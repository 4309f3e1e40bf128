//! # Record Store
//!
//! An actor-backed persistence layer. Each record type gets its own
//! [`ResourceActor`] running in a Tokio task; the actor owns the rows, applies writes one
//! at a time and answers through a cheap, cloneable [`ResourceClient`].
//!
//! ## Guarantees
//!
//! - **Single-row atomicity**: a create, update or action either commits completely or
//!   leaves the stored row untouched.
//! - **Unique keys**: a record may declare a natural key
//!   ([`ActorEntity::unique_key`]); a second row claiming the same key is rejected with
//!   [`FrameworkError::Conflict`]. Callers use this both as a uniqueness constraint
//!   (customer phone numbers) and as an idempotency key (one ledger row per order).
//! - **Monotonic ids**: ids come from a per-store `u32` counter.
//! - **No deletes**: rows are terminated through their own state, never removed.
//!
//! ## Layers
//!
//! 1. **Record Layer** ([`ActorEntity`]) - the row type and its hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and the key index
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe requests
//!
//! ## Context Injection
//!
//! Dependencies are handed to `run(context)` rather than `new()`, so two stores can be
//! created first and wired afterwards. A customer store, for instance, receives the
//! loyalty-transaction client it appends to.
//!
//! ```rust
//! use record_store::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Courier { id: u32, phone: String }
//! #[derive(Debug)] struct CourierCreate { phone: String }
//! #[derive(Debug)] struct CourierUpdate;
//! #[derive(Debug)] enum CourierAction {}
//! #[derive(Debug, thiserror::Error)]
//! #[error("courier error")]
//! struct CourierError;
//!
//! #[async_trait]
//! impl ActorEntity for Courier {
//!     type Id = u32;
//!     type Create = CourierCreate;
//!     type Update = CourierUpdate;
//!     type Action = CourierAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = CourierError;
//!
//!     fn from_create_params(id: u32, params: CourierCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, phone: params.phone })
//!     }
//!     fn unique_key(&self) -> Option<String> {
//!         Some(self.phone.clone())
//!     }
//!     async fn on_update(&mut self, _: CourierUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: CourierAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Courier>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CourierCreate { phone: "5511999990000".into() }).await.unwrap();
//!     let found = client.find_by_key("5511999990000").await.unwrap().unwrap();
//!     assert_eq!(found.id, id);
//!
//!     let duplicate = client.create(CourierCreate { phone: "5511999990000".into() }).await;
//!     assert!(duplicate.is_err());
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module replaces a real actor with scripted responses so the logic around
//! a client can be tested deterministically.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
