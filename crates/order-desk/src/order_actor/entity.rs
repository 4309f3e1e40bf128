//! [`ActorEntity`] implementation for [`Order`].
//!
//! The order number doubles as the unique key, so an order can also be fetched by the
//! number printed on its receipt.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use async_trait::async_trait;
use record_store::ActorEntity;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Order::open(id, params)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.order_number.clone())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.apply_update(update)
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::Transition(to) => self.advance(to)?,
            OrderAction::AddItems(items) => self.add_items(items)?,
            OrderAction::UpdateItemQuantity { line_id, quantity } => {
                self.set_item_quantity(line_id, quantity)?
            }
            OrderAction::UpdateItemNotes { line_id, notes } => {
                self.set_item_notes(line_id, notes)?
            }
            OrderAction::Complete {
                payment_method,
                effects,
            } => self.complete(payment_method, effects)?,
            OrderAction::Cancel => self.cancel()?,
            OrderAction::ClearEffect(effect) => {
                self.pending_effects.remove(&effect);
            }
        }
        Ok(self.clone())
    }
}
