//! # Order Client
//!
//! Typed wrapper around `ResourceClient<Order>`. Each method is one request to the order
//! actor; the actor applies it atomically to a single order row.
use crate::model::{
    NewOrderItem, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, PaymentMethod,
    SideEffect,
};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use record_store::{ActorClient, Filter, FrameworkError, ResourceClient};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(channel = ?params.channel, status = %params.status))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "create_order called");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Look an order up by the number printed on its receipt.
    pub async fn find_by_number(&self, number: &str) -> Result<Option<Order>, OrderError> {
        self.find_by_key(number.to_string()).await
    }

    /// Fetch an order that must exist.
    pub async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn transition(&self, id: OrderId, to: OrderStatus) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Transition(to)).await
    }

    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn add_items(&self, id: OrderId, items: Vec<NewOrderItem>) -> Result<Order, OrderError> {
        self.act(id, OrderAction::AddItems(items)).await
    }

    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        id: OrderId,
        line_id: u32,
        quantity: u32,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::UpdateItemQuantity { line_id, quantity })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_item_notes(
        &self,
        id: OrderId,
        line_id: u32,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::UpdateItemNotes { line_id, notes })
            .await
    }

    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        id: OrderId,
        payment_method: Option<PaymentMethod>,
        effects: BTreeSet<SideEffect>,
    ) -> Result<Order, OrderError> {
        self.act(
            id,
            OrderAction::Complete {
                payment_method,
                effects,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Cancel).await
    }

    #[instrument(skip(self))]
    pub async fn clear_effect(&self, id: OrderId, effect: SideEffect) -> Result<Order, OrderError> {
        self.act(id, OrderAction::ClearEffect(effect)).await
    }

    /// Completed orders that still owe at least one follow-up step.
    pub async fn with_pending_effects(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .list(Filter::new(|order: &Order| {
                order.status == OrderStatus::Completed && !order.pending_effects.is_empty()
            }))
            .await?;
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!(?action, "Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Conflict(number) => {
                OrderError::ValidationError(format!("duplicate order number {number}"))
            }
            other => other
                .downcast_entity::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}
