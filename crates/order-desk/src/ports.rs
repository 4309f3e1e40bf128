//! # External Boundaries
//!
//! Traits for the collaborators the desk consumes but does not own. The in-memory
//! implementations in [`adapters`](crate::adapters) back the demo and the tests; a
//! deployment plugs in its own.

use crate::model::{Customization, MenuItem, MenuItemId, Money};
use crate::receipt::ReceiptPayload;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Menu item not found: {0}")]
    UnknownItem(MenuItemId),

    #[error("No delivery zone covers {0} km")]
    OutOfRange(f64),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PrintError {
    #[error("Printer unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(u64),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MessagingError {
    #[error("Message to {phone} failed: {reason}")]
    SendFailed { phone: String, reason: String },
}

/// Read-only access to menu items and their customizations.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, CatalogError>;

    async fn get_variations(&self, menu_item_id: MenuItemId)
        -> Result<Vec<Customization>, CatalogError>;
}

/// Delivery fee by distance, consulted before a delivery order is created.
#[async_trait]
pub trait DeliveryFeeTable: Send + Sync {
    async fn fee_for_distance(&self, km: f64) -> Result<Money, CatalogError>;
}

/// A rendered receipt waiting to be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub u64);

/// Physical or virtual printer.
#[async_trait]
pub trait PrintSurface: Send + Sync {
    async fn render(&self, payload: &ReceiptPayload) -> Result<DocumentHandle, PrintError>;

    async fn print(&self, document: DocumentHandle) -> Result<(), PrintError>;
}

/// Outbound text messages. One call, no retries.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    async fn send(&self, phone: &str, text: &str) -> Result<(), MessagingError>;
}
