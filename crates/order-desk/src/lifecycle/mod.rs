//! # System Lifecycle
//!
//! Starting, wiring and stopping the desk.
//!
//! [`DeskSystem::new`] creates one record actor per row type, starts each in its own
//! task, and injects dependencies through the actor context: the customer actor receives
//! the loyalty-transaction client so it can append ledger rows as part of applying them.
//!
//! ```text
//! orders ─┐
//! tables ─┤
//! customers ──► loyalty transactions
//! cash ───┼──► OrderDesk ──► ReceiptPrinter ──► PrintSurface
//! couriers┘          └─────► CourierDispatch ─► MessagingChannel
//! ```
//!
//! ## Shutdown
//!
//! Dropping every client closes the actors' mailboxes; each actor drains and exits. The
//! dependency graph is acyclic (customers hold a loyalty client, nothing holds a customer
//! client), so closing the channels is enough and no explicit shutdown message is needed.

pub mod desk_system;
pub mod tracing;

pub use self::desk_system::{DeskPorts, DeskSystem};
pub use self::tracing::setup_tracing;
