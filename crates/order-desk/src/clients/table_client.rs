//! # Table Client
//!
//! The table registry used by dine-in tabs.
use crate::model::{OrderId, Table, TableCreate, TableId};
use crate::table_actor::{TableAction, TableError};
use async_trait::async_trait;
use record_store::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TableClient {
    inner: ResourceClient<Table>,
}

impl TableClient {
    pub fn new(inner: ResourceClient<Table>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn register(&self, number: u32) -> Result<TableId, TableError> {
        debug!("Sending request");
        self.inner
            .create(TableCreate { number })
            .await
            .map_err(Self::map_error)
    }

    pub async fn find_by_number(&self, number: u32) -> Result<Option<Table>, TableError> {
        self.find_by_key(number.to_string()).await
    }

    #[instrument(skip(self))]
    pub async fn occupy(&self, id: TableId, order_id: OrderId) -> Result<Table, TableError> {
        self.inner
            .perform_action(id, TableAction::Occupy(order_id))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn free(&self, id: TableId) -> Result<Table, TableError> {
        self.inner
            .perform_action(id, TableAction::Free)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Table> for TableClient {
    type Error = TableError;

    fn inner(&self) -> &ResourceClient<Table> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => TableError::NotFound(id),
            FrameworkError::Conflict(number) => TableError::DuplicateNumber(number),
            other => other
                .downcast_entity::<TableError>()
                .unwrap_or_else(|e| TableError::ActorCommunicationError(e.to_string())),
        }
    }
}
