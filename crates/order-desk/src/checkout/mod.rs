//! # Checkout Orchestration
//!
//! [`OrderDesk`] is the single entry point every sales channel finalizes through. Each
//! channel is its own path into the same order state machine:
//!
//! | Channel | Inserted as | Ledgers run |
//! |---|---|---|
//! | Counter | `completed` | at checkout |
//! | Kiosk | `preparing` | on [`OrderDesk::confirm_payment`] |
//! | Dine-in tab | `new` | when the POS calls [`OrderDesk::complete_order`] |
//!
//! ## Saga
//!
//! A sale is durable once its order row is written. Everything after that (loyalty,
//! cash, receipt, courier) is a side effect: the order records which ones it still owes
//! in `pending_effects`, each step clears its own marker on success, and a failure is
//! collected as a [`SideEffectWarning`] and published as a notice instead of failing the
//! sale. [`OrderDesk::reconcile`] picks up whatever is left.
//!
//! ```text
//! validate ──► resolve customer ──► insert order ══► loyalty ──► cash ──► print ──► courier
//!   (Validation)                    (Persistence)    └──────── warnings only ────────┘
//! ```

mod desk;
mod error;
mod request;

pub use desk::{DeskParts, OrderDesk};
pub use error::{CheckoutError, SideEffectWarning};
pub use request::{
    CheckoutReport, CounterSale, CustomerDetails, KioskSale, ReconcileReport, TabRequest,
};
