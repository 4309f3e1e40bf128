//! In-memory implementations of the [`ports`](crate::ports).
//!
//! The recording adapters keep everything they receive and can be switched into a failing
//! mode, which is how the tests exercise non-fatal print and messaging errors.

use crate::model::{Customization, MenuItem, MenuItemId, Money};
use crate::ports::{
    CatalogError, CatalogLookup, DeliveryFeeTable, DocumentHandle, MessagingChannel,
    MessagingError, PrintError, PrintSurface,
};
use crate::receipt::{ReceiptKind, ReceiptPayload, Via};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// CATALOG
// =============================================================================

/// A fixed menu.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<MenuItemId, MenuItem>,
    variations: HashMap<MenuItemId, Vec<Customization>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: MenuItem, variations: Vec<Customization>) -> Self {
        self.variations.insert(item.id, variations);
        self.items.insert(item.id, item);
        self
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, CatalogError> {
        self.items
            .get(&id)
            .cloned()
            .ok_or(CatalogError::UnknownItem(id))
    }

    async fn get_variations(&self, menu_item_id: MenuItemId) -> Result<Vec<Customization>, CatalogError> {
        if !self.items.contains_key(&menu_item_id) {
            return Err(CatalogError::UnknownItem(menu_item_id));
        }
        Ok(self.variations.get(&menu_item_id).cloned().unwrap_or_default())
    }
}

/// Delivery fees by distance band: the first band whose limit covers the distance wins.
#[derive(Debug, Clone, Default)]
pub struct ZoneFeeTable {
    bands: Vec<(f64, Money)>,
}

impl ZoneFeeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a band covering distances up to `max_km`.
    pub fn with_band(mut self, max_km: f64, fee: Money) -> Self {
        self.bands.push((max_km, fee));
        self.bands.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }
}

#[async_trait]
impl DeliveryFeeTable for ZoneFeeTable {
    async fn fee_for_distance(&self, km: f64) -> Result<Money, CatalogError> {
        if !km.is_finite() || km < 0.0 {
            return Err(CatalogError::OutOfRange(km));
        }
        self.bands
            .iter()
            .find(|(max_km, _)| km <= *max_km)
            .map(|(_, fee)| *fee)
            .ok_or(CatalogError::OutOfRange(km))
    }
}

// =============================================================================
// PRINTER
// =============================================================================

/// One completed print call.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub kind: ReceiptKind,
    pub order_number: String,
    pub via: Option<Via>,
    pub text: String,
    pub printed_at: Instant,
}

#[derive(Default)]
struct PrinterState {
    next_handle: u64,
    rendered: HashMap<u64, ReceiptPayload>,
    jobs: Vec<PrintJob>,
    failing: bool,
}

/// A print surface that keeps every job in memory.
#[derive(Clone, Default)]
pub struct RecordingPrinter {
    state: Arc<Mutex<PrinterState>>,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// While failing, every render is rejected as if the printer were offline.
    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }

    pub fn jobs(&self) -> Vec<PrintJob> {
        lock(&self.state).jobs.clone()
    }

    pub fn jobs_for(&self, order_number: &str, kind: ReceiptKind) -> Vec<PrintJob> {
        lock(&self.state)
            .jobs
            .iter()
            .filter(|job| job.order_number == order_number && job.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PrintSurface for RecordingPrinter {
    async fn render(&self, payload: &ReceiptPayload) -> Result<DocumentHandle, PrintError> {
        let mut state = lock(&self.state);
        if state.failing {
            return Err(PrintError::Unavailable("printer offline".into()));
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.rendered.insert(handle, payload.clone());
        Ok(DocumentHandle(handle))
    }

    async fn print(&self, document: DocumentHandle) -> Result<(), PrintError> {
        let mut state = lock(&self.state);
        let payload = state
            .rendered
            .remove(&document.0)
            .ok_or(PrintError::UnknownDocument(document.0))?;
        state.jobs.push(PrintJob {
            kind: payload.kind,
            order_number: payload.order.order_number.clone(),
            via: payload.via,
            text: payload.render_text(),
            printed_at: Instant::now(),
        });
        Ok(())
    }
}

// =============================================================================
// MESSAGING
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub phone: String,
    pub text: String,
    pub sent_at: Instant,
}

#[derive(Default)]
struct MessengerState {
    sent: Vec<SentMessage>,
    attempts: usize,
    failing: bool,
}

/// A messaging channel that keeps every message in memory.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    state: Arc<Mutex<MessengerState>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.state).sent.clone()
    }

    /// Calls made, successful or not.
    pub fn attempts(&self) -> usize {
        lock(&self.state).attempts
    }
}

#[async_trait]
impl MessagingChannel for RecordingMessenger {
    async fn send(&self, phone: &str, text: &str) -> Result<(), MessagingError> {
        let mut state = lock(&self.state);
        state.attempts += 1;
        if state.failing {
            return Err(MessagingError::SendFailed {
                phone: phone.to_string(),
                reason: "gateway unreachable".into(),
            });
        }
        state.sent.push(SentMessage {
            phone: phone.to_string(),
            text: text.to_string(),
            sent_at: Instant::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zone_fee_bands() {
        let table = ZoneFeeTable::new()
            .with_band(6.0, Money::from_reais(8, 0))
            .with_band(3.0, Money::from_reais(5, 0));

        assert_eq!(table.fee_for_distance(2.5).await.unwrap(), Money::from_reais(5, 0));
        assert_eq!(table.fee_for_distance(3.0).await.unwrap(), Money::from_reais(5, 0));
        assert_eq!(table.fee_for_distance(5.9).await.unwrap(), Money::from_reais(8, 0));
        assert_eq!(
            table.fee_for_distance(10.0).await,
            Err(CatalogError::OutOfRange(10.0))
        );
    }

    #[tokio::test]
    async fn test_static_catalog_lookup() {
        let item = MenuItem::new(1, "Pastel", Money::from_reais(9, 0));
        let cheese = Customization::new(10, item.id, "Cheese", Money::from_reais(2, 0));
        let catalog = StaticCatalog::new().with_item(item.clone(), vec![cheese.clone()]);

        assert_eq!(catalog.get_menu_item(item.id).await.unwrap(), item);
        assert_eq!(catalog.get_variations(item.id).await.unwrap(), vec![cheese]);
        assert_eq!(
            catalog.get_menu_item(MenuItemId(99)).await,
            Err(CatalogError::UnknownItem(MenuItemId(99)))
        );
    }

    #[tokio::test]
    async fn test_failing_messenger_counts_attempts() {
        let messenger = RecordingMessenger::new();
        messenger.set_failing(true);
        assert!(messenger.send("11999990000", "hi").await.is_err());
        assert_eq!(messenger.attempts(), 1);
        assert!(messenger.sent().is_empty());
    }
}
