//! # Courier Dispatch
//!
//! Best-effort courier notification after a delivery order is finalized. The message is
//! sent from a spawned task after a short delay, so the order row is committed before the
//! courier hears about it. One attempt per call; a failure is reported to the operator
//! and the `courier` marker stays pending for the next reconciliation pass.

use crate::clients::{CourierClient, OrderClient};
use crate::courier_actor::CourierError;
use crate::model::{CourierId, Order, OrderId, SideEffect};
use crate::notices::{Notice, Notifier};
use crate::order_actor::OrderError;
use crate::ports::{MessagingChannel, MessagingError};
use record_store::ActorClient;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("Courier not found: {0}")]
    CourierNotFound(CourierId),

    #[error("Courier {0} is inactive")]
    CourierInactive(String),

    #[error("Courier {0} has no contact phone")]
    MissingContact(String),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl DispatchError {
    /// Problems the operator fixes in the courier register rather than by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DispatchError::CourierNotFound(_)
                | DispatchError::CourierInactive(_)
                | DispatchError::MissingContact(_)
        )
    }
}

pub type DispatchHandle = JoinHandle<Result<(), DispatchError>>;

#[derive(Clone)]
pub struct CourierDispatch {
    couriers: CourierClient,
    orders: OrderClient,
    messenger: Arc<dyn MessagingChannel>,
    notifier: Notifier,
    delay: Duration,
    in_flight: Arc<Mutex<HashSet<OrderId>>>,
}

impl CourierDispatch {
    pub fn new(
        couriers: CourierClient,
        orders: OrderClient,
        messenger: Arc<dyn MessagingChannel>,
        notifier: Notifier,
        delay: Duration,
    ) -> Self {
        Self {
            couriers,
            orders,
            messenger,
            notifier,
            delay,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Schedule the courier message for `order`.
    ///
    /// Returns `None` when the order has no courier or a dispatch for it is already
    /// waiting. The caller may drop the handle; the task runs regardless.
    pub fn notify(&self, order: &Order) -> Option<DispatchHandle> {
        let Some(courier_id) = order.motoboy_id else {
            debug!(order_id = %order.id, "No courier assigned");
            return None;
        };
        if !self.claim(order.id) {
            debug!(order_id = %order.id, "Courier dispatch already in flight");
            return None;
        }

        let dispatch = self.clone();
        let order = order.clone();
        let span = info_span!("courier_dispatch", order_id = %order.id, %courier_id);
        Some(tokio::spawn(
            async move {
                tokio::time::sleep(dispatch.delay).await;
                let result = dispatch.deliver(&order, courier_id).await;
                dispatch.release(order.id);
                result
            }
            .instrument(span),
        ))
    }

    pub fn in_flight(&self, order_id: OrderId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&order_id)
    }

    fn claim(&self, order_id: OrderId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order_id)
    }

    fn release(&self, order_id: OrderId) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&order_id);
    }

    async fn deliver(&self, order: &Order, courier_id: CourierId) -> Result<(), DispatchError> {
        let courier = match self.couriers.get(courier_id).await? {
            Some(courier) => courier,
            None => return Err(self.misconfigured(order, DispatchError::CourierNotFound(courier_id))),
        };
        if !courier.is_active {
            return Err(self.misconfigured(order, DispatchError::CourierInactive(courier.name)));
        }
        let Some(phone) = courier.contact() else {
            return Err(self.misconfigured(order, DispatchError::MissingContact(courier.name.clone())));
        };

        if let Err(e) = self.messenger.send(phone, &Self::message(order)).await {
            warn!(error = %e, "Courier notification failed");
            self.notifier.publish(Notice::CourierSendFailed {
                order_number: order.order_number.clone(),
                reason: e.to_string(),
            });
            return Err(e.into());
        }

        info!(courier = %courier.name, "Courier notified");
        self.orders.clear_effect(order.id, SideEffect::Courier).await?;
        Ok(())
    }

    fn misconfigured(&self, order: &Order, error: DispatchError) -> DispatchError {
        warn!(%error, "Courier cannot be reached");
        self.notifier.publish(Notice::CourierConfiguration {
            order_number: order.order_number.clone(),
            reason: error.to_string(),
        });
        error
    }

    fn message(order: &Order) -> String {
        let mut text = format!("New delivery: {}\nTotal: {}", order.order_number, order.total);
        if let Some(method) = order.payment_method {
            text.push_str(&format!("\nPayment: {method}"));
        }
        for item in &order.items {
            text.push_str(&format!("\n{}x {}", item.quantity, item.name));
        }
        if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            text.push_str(&format!("\nNotes: {notes}"));
        }
        text
    }
}
