//! # Cash Movement Client
use crate::cash_actor::CashError;
use crate::model::{CashMovement, CashMovementCreate, CashMovementId, OrderId};
use async_trait::async_trait;
use record_store::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for the cash-drawer ledger.
#[derive(Clone)]
pub struct CashMovementClient {
    inner: ResourceClient<CashMovement>,
}

impl CashMovementClient {
    pub fn new(inner: ResourceClient<CashMovement>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn record(&self, params: CashMovementCreate) -> Result<CashMovementId, CashError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// The income row of a sale, if it was recorded.
    pub async fn find_sale(&self, order_id: OrderId) -> Result<Option<CashMovement>, CashError> {
        self.find_by_key(CashMovement::sale_key(order_id)).await
    }

    /// Every movement tied to an order.
    pub async fn for_order(&self, order_id: OrderId) -> Result<Vec<CashMovement>, CashError> {
        self.list(Filter::new(move |movement: &CashMovement| {
            movement.order_id == Some(order_id)
        }))
        .await
    }
}

#[async_trait]
impl ActorClient<CashMovement> for CashMovementClient {
    type Error = CashError;

    fn inner(&self) -> &ResourceClient<CashMovement> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CashError::NotFound(id),
            FrameworkError::Conflict(key) => CashError::Duplicate(key),
            other => other
                .downcast_entity::<CashError>()
                .unwrap_or_else(|e| CashError::ActorCommunicationError(e.to_string())),
        }
    }
}
