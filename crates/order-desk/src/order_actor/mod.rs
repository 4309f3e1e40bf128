//! # Order Actor
//!
//! Owns every [`Order`] row. Orders are never deleted; they end in `Completed` or
//! `Canceled`.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](record_store::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`]: status transitions, item edits, effect markers
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use order_desk::order_actor;
//! use order_desk::model::{Channel, DeliveryType, Money, MenuItemId, NewOrderItem, OrderCreate, OrderStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = order_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let mut params = OrderCreate::new(Channel::DineIn, DeliveryType::DineIn, OrderStatus::New);
//!     params.service_fee_bp = Some(1000);
//!     let id = client.create_order(params).await?;
//!
//!     let order = client
//!         .add_items(id, vec![NewOrderItem {
//!             menu_item_id: MenuItemId(1),
//!             name: "Feijoada".into(),
//!             quantity: 1,
//!             unit_price: Money::from_reais(50, 0),
//!             notes: None,
//!         }])
//!         .await?;
//!     assert_eq!(order.total, Money::from_reais(55, 0));
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use record_store::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
