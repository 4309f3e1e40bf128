//! # Order Desk
//!
//! Order fulfillment and customer ledger for a single restaurant. Every sales channel
//! (staffed counter, self-service kiosk, dine-in tab) turns a cart into a durable
//! [`Order`](model::Order) through the same [`OrderDesk`](checkout::OrderDesk), which then
//! performs the sale's side effects exactly once: loyalty accrual, a cash-ledger entry, a
//! printed receipt and an optional courier message.
//!
//! ## Layout
//!
//! - [`model`]: rows and value types ([`Money`](model::Money), [`Order`](model::Order), ...).
//! - `*_actor` modules: one record-store actor per row type, each with its error type.
//! - [`clients`]: typed clients for those actors.
//! - [`cart`], [`kiosk`], [`directory`]: what a channel does before checkout.
//! - [`checkout`], [`ledger`], [`receipt`], [`dispatch`]: the checkout saga and its steps.
//! - [`ports`] and [`adapters`]: external boundaries and in-memory implementations.
//! - [`lifecycle`]: starting and stopping the whole system.

pub mod adapters;
pub mod cart;
pub mod cash_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod courier_actor;
pub mod customer_actor;
pub mod directory;
pub mod dispatch;
pub mod kiosk;
pub mod ledger;
pub mod lifecycle;
pub mod loyalty_actor;
pub mod model;
pub mod notices;
pub mod order_actor;
pub mod ports;
pub mod receipt;
pub mod session;
pub mod table_actor;
