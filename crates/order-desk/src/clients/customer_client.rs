//! # Customer Client
//!
//! Provides a high-level API for the `Customer` actor. Phone lookups go through the
//! store's unique-key index.
use crate::customer_actor::{
    CustomerAction, CustomerActionResult, CustomerError, LoyaltyApplied, LoyaltyEntry,
};
use crate::model::{Customer, CustomerCreate, CustomerId, CustomerUpdate};
use async_trait::async_trait;
use record_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }

    /// Fails with [`CustomerError::DuplicatePhone`] when the phone is taken.
    #[instrument(skip(self, params), fields(phone = %params.phone))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!(?params, "create_customer called");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Exact match on the stored (trimmed) phone.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, CustomerError> {
        self.find_by_key(phone.trim().to_string()).await
    }

    pub async fn fetch(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.get(id)
            .await?
            .ok_or_else(|| CustomerError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn apply_loyalty(
        &self,
        id: CustomerId,
        entry: LoyaltyEntry,
    ) -> Result<LoyaltyApplied, CustomerError> {
        match self.act(id, CustomerAction::ApplyLoyalty(entry)).await? {
            CustomerActionResult::ApplyLoyalty(applied) => Ok(applied),
            _ => Err(Self::unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_suspicious(
        &self,
        id: CustomerId,
        reason: &str,
    ) -> Result<Customer, CustomerError> {
        let action = CustomerAction::MarkSuspicious {
            reason: reason.to_string(),
        };
        match self.act(id, action).await? {
            CustomerActionResult::MarkSuspicious(customer) => Ok(customer),
            _ => Err(Self::unexpected()),
        }
    }

    #[instrument(skip(self))]
    pub async fn clear_suspicious(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        match self.act(id, CustomerAction::ClearSuspicious).await? {
            CustomerActionResult::ClearSuspicious(customer) => Ok(customer),
            _ => Err(Self::unexpected()),
        }
    }

    async fn act(
        &self,
        id: CustomerId,
        action: CustomerAction,
    ) -> Result<CustomerActionResult, CustomerError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    fn unexpected() -> CustomerError {
        CustomerError::ActorCommunicationError("Unexpected action result".to_string())
    }
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            FrameworkError::Conflict(phone) => CustomerError::DuplicatePhone(phone),
            other => other
                .downcast_entity::<CustomerError>()
                .unwrap_or_else(|e| CustomerError::ActorCommunicationError(e.to_string())),
        }
    }
}
