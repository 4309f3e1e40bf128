//! # Operator Notices
//!
//! Non-blocking messages for the person running a channel: warnings that must be seen
//! but must never stop a sale. Delivered over a tokio broadcast channel, so any number of
//! screens can subscribe and a slow or absent subscriber costs the publisher nothing.

use crate::model::SideEffect;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    /// Advisory only; the sale continues.
    SuspiciousCustomer { phone: String, reason: String },
    PrintFailed { order_number: String, reason: String },
    /// The courier cannot be reached as configured (missing contact, inactive, unknown).
    CourierConfiguration { order_number: String, reason: String },
    CourierSendFailed { order_number: String, reason: String },
    /// A ledger write failed and is left for reconciliation.
    LedgerFailed {
        order_number: String,
        effect: SideEffect,
        reason: String,
    },
    /// The kiosk went idle and its cart was cleared.
    KioskReset,
}

#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Fire and forget. With nobody listening the notice is only logged.
    pub fn publish(&self, notice: Notice) {
        warn!(?notice, "Operator notice");
        if self.sender.send(notice).is_err() {
            debug!("No notice subscribers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let notifier = Notifier::new(8);
        let mut screen = notifier.subscribe();
        notifier.publish(Notice::KioskReset);
        assert_eq!(screen.recv().await.unwrap(), Notice::KioskReset);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let notifier = Notifier::default();
        notifier.publish(Notice::KioskReset);
    }
}
