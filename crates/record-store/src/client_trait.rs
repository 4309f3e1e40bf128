//! # ActorClient Trait
//!
//! Common read operations for the domain-specific wrappers built around a
//! [`ResourceClient`]. A wrapper supplies `inner` and `map_error`; `get`, `find_by_key`
//! and `list` come for free.
use crate::{ActorEntity, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for record-specific clients to inherit the standard read operations.
///
/// # Example
///
/// ```rust
/// use record_store::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Table { id: u32, number: u32 }
/// #[derive(Debug)] struct TableCreate { number: u32 }
/// #[derive(Debug)] struct TableUpdate;
/// #[derive(Debug)] enum TableAction {}
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct TableError(String);
///
/// impl From<String> for TableError {
///     fn from(s: String) -> Self { TableError(s) }
/// }
///
/// #[async_trait]
/// impl ActorEntity for Table {
///     type Id = u32;
///     type Create = TableCreate;
///     type Update = TableUpdate;
///     type Action = TableAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = TableError;
///
///     fn from_create_params(id: u32, params: TableCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, number: params.number })
///     }
///     async fn on_update(&mut self, _: TableUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: TableAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct TableClient {
///     inner: ResourceClient<Table>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Table> for TableClient {
///     type Error = TableError;
///
///     fn inner(&self) -> &ResourceClient<Table> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         TableError(e.to_string())
///     }
/// }
///
/// async fn usage(client: TableClient) {
///     let _ = client.get(1).await;
///     let _ = client.list_all().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The record-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map store errors to the record-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a row by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch a row by its unique key.
    #[tracing::instrument(skip(self))]
    async fn find_by_key(&self, key: String) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find_by_key(key).await.map_err(Self::map_error)
    }

    /// Fetch every row the filter accepts.
    #[tracing::instrument(skip(self, filter))]
    async fn list(&self, filter: Filter<T>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(filter).await.map_err(Self::map_error)
    }

    /// Fetch every row.
    async fn list_all(&self) -> Result<Vec<T>, Self::Error> {
        self.list(Filter::all()).await
    }
}
