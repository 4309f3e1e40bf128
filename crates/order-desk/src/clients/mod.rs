//! Typed clients, one per record actor. Each wraps a `ResourceClient` and maps store
//! errors into the record's own error enum.

pub mod cash_client;
pub mod courier_client;
pub mod customer_client;
pub mod loyalty_client;
pub mod order_client;
pub mod table_client;

pub use cash_client::CashMovementClient;
pub use courier_client::CourierClient;
pub use customer_client::CustomerClient;
pub use loyalty_client::LoyaltyTransactionClient;
pub use order_client::OrderClient;
pub use table_client::TableClient;
