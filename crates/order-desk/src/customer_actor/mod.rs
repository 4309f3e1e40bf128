//! # Customer Actor
//!
//! Owns every [`Customer`] row. Phone numbers are the store's unique key, which is what
//! prevents duplicate customers when two checkouts resolve the same new number at once.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](record_store::ActorEntity) implementation for [`Customer`]
//! - [`error`] - [`CustomerError`]
//! - [`actions`] - [`CustomerAction`]: loyalty application and the suspicious flag
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Context
//!
//! The actor is started with a [`LoyaltyTransactionClient`](crate::clients::LoyaltyTransactionClient):
//!
//! ```rust
//! use order_desk::{customer_actor, loyalty_actor};
//! use order_desk::customer_actor::LoyaltyEntry;
//! use order_desk::model::{CustomerCreate, LoyaltyKind, OrderId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (loyalty_actor, loyalty_client) = loyalty_actor::new(32);
//!     let (customer_actor, customers) = customer_actor::new(32);
//!     tokio::spawn(loyalty_actor.run(()));
//!     tokio::spawn(customer_actor.run(loyalty_client));
//!
//!     let id = customers
//!         .create_customer(CustomerCreate {
//!             phone: "11987654321".into(),
//!             name: "Ana".into(),
//!             cpf: Some("123.456.789-00".into()),
//!         })
//!         .await?;
//!
//!     let entry = LoyaltyEntry {
//!         order_id: OrderId(1),
//!         kind: LoyaltyKind::Earn,
//!         points: 39,
//!         description: "Order PDV-00001".into(),
//!     };
//!     let first = customers.apply_loyalty(id, entry.clone()).await?;
//!     let retry = customers.apply_loyalty(id, entry).await?;
//!     assert_eq!(first.balance, 39);
//!     assert_eq!(retry.balance, 39);
//!     assert!(!retry.newly_applied);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::CustomerClient;
use crate::model::Customer;
use record_store::ResourceActor;

/// Creates a new Customer actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Customer>, CustomerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CustomerClient::new(generic_client))
}
