//! # Courier Client
use crate::courier_actor::CourierError;
use crate::model::{Courier, CourierCreate, CourierId, CourierUpdate};
use async_trait::async_trait;
use record_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CourierClient {
    inner: ResourceClient<Courier>,
}

impl CourierClient {
    pub fn new(inner: ResourceClient<Courier>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn register(&self, params: CourierCreate) -> Result<CourierId, CourierError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_courier(
        &self,
        id: CourierId,
        update: CourierUpdate,
    ) -> Result<Courier, CourierError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Courier> for CourierClient {
    type Error = CourierError;

    fn inner(&self) -> &ResourceClient<Courier> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CourierError::NotFound(id),
            other => other
                .downcast_entity::<CourierError>()
                .unwrap_or_else(|e| CourierError::ActorCommunicationError(e.to_string())),
        }
    }
}
