//! # Loyalty Transaction Client
use crate::loyalty_actor::LoyaltyError;
use crate::model::{
    CustomerId, LoyaltyKind, LoyaltyTransaction, LoyaltyTransactionCreate, LoyaltyTransactionId,
    OrderId,
};
use async_trait::async_trait;
use record_store::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for the append-only loyalty ledger.
#[derive(Clone)]
pub struct LoyaltyTransactionClient {
    inner: ResourceClient<LoyaltyTransaction>,
}

impl LoyaltyTransactionClient {
    pub fn new(inner: ResourceClient<LoyaltyTransaction>) -> Self {
        Self { inner }
    }

    /// Append a row. Fails with [`LoyaltyError::Duplicate`] when the order already has a
    /// row of this kind.
    #[instrument(skip(self))]
    pub async fn append(
        &self,
        params: LoyaltyTransactionCreate,
    ) -> Result<LoyaltyTransactionId, LoyaltyError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Fetch a row that must exist.
    pub async fn fetch(&self, id: LoyaltyTransactionId) -> Result<LoyaltyTransaction, LoyaltyError> {
        self.get(id)
            .await?
            .ok_or_else(|| LoyaltyError::NotFound(id.to_string()))
    }

    pub async fn find_for_order(
        &self,
        kind: LoyaltyKind,
        order_id: OrderId,
    ) -> Result<Option<LoyaltyTransaction>, LoyaltyError> {
        self.find_by_key(LoyaltyTransaction::key_for(kind, order_id))
            .await
    }

    /// Every row of one customer, oldest first.
    pub async fn for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<LoyaltyTransaction>, LoyaltyError> {
        let mut rows = self
            .list(Filter::new(move |tx: &LoyaltyTransaction| {
                tx.customer_id == customer_id
            }))
            .await?;
        rows.sort_by_key(|tx| tx.id);
        Ok(rows)
    }
}

#[async_trait]
impl ActorClient<LoyaltyTransaction> for LoyaltyTransactionClient {
    type Error = LoyaltyError;

    fn inner(&self) -> &ResourceClient<LoyaltyTransaction> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => LoyaltyError::NotFound(id),
            FrameworkError::Conflict(key) => LoyaltyError::Duplicate(key),
            other => other
                .downcast_entity::<LoyaltyError>()
                .unwrap_or_else(|e| LoyaltyError::ActorCommunicationError(e.to_string())),
        }
    }
}
