use crate::checkout::{DeskParts, OrderDesk};
use crate::clients::{
    CashMovementClient, CourierClient, CustomerClient, LoyaltyTransactionClient, OrderClient,
    TableClient,
};
use crate::config::DeskConfig;
use crate::directory::{CustomerDirectory, PhoneDebouncer};
use crate::dispatch::CourierDispatch;
use crate::kiosk::KioskSession;
use crate::ledger::{CashLedger, LoyaltyLedger};
use crate::notices::Notifier;
use crate::ports::{DeliveryFeeTable, MessagingChannel, PrintSurface};
use crate::receipt::ReceiptPrinter;
use crate::session::SessionStore;
use crate::{cash_actor, courier_actor, customer_actor, loyalty_actor, order_actor, table_actor};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The external collaborators a desk talks to.
#[derive(Clone)]
pub struct DeskPorts {
    pub printer: Arc<dyn PrintSurface>,
    pub messenger: Arc<dyn MessagingChannel>,
    pub delivery_fees: Arc<dyn DeliveryFeeTable>,
}

/// Owns the record actors of one restaurant and the [`OrderDesk`] wired on top of them.
///
/// # Example
///
/// ```rust
/// use order_desk::adapters::{RecordingMessenger, RecordingPrinter, ZoneFeeTable};
/// use order_desk::config::DeskConfig;
/// use order_desk::lifecycle::{DeskPorts, DeskSystem};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let ports = DeskPorts {
///         printer: Arc::new(RecordingPrinter::new()),
///         messenger: Arc::new(RecordingMessenger::new()),
///         delivery_fees: Arc::new(ZoneFeeTable::new()),
///     };
///     let system = DeskSystem::new(DeskConfig::default(), ports);
///     let report = system.desk.reconcile().await.map_err(|e| e.to_string())?;
///     assert_eq!(report.scanned, 0);
///     system.shutdown().await
/// }
/// ```
pub struct DeskSystem {
    pub orders: OrderClient,
    pub customers: CustomerClient,
    pub loyalty_transactions: LoyaltyTransactionClient,
    pub cash_movements: CashMovementClient,
    pub tables: TableClient,
    pub couriers: CourierClient,
    pub desk: OrderDesk,
    pub notifier: Notifier,
    sessions: Arc<SessionStore>,
    config: DeskConfig,
    handles: Vec<JoinHandle<()>>,
}

impl DeskSystem {
    /// Spawn every record actor and wire the desk. Must be called inside a tokio runtime.
    pub fn new(config: DeskConfig, ports: DeskPorts) -> Self {
        let buffer = config.store_buffer;

        // 1. Create actors
        let (order_actor, orders) = order_actor::new(buffer);
        let (customer_actor, customers) = customer_actor::new(buffer);
        let (loyalty_actor, loyalty_transactions) = loyalty_actor::new(buffer);
        let (cash_actor, cash_movements) = cash_actor::new(buffer);
        let (table_actor, tables) = table_actor::new(buffer);
        let (courier_actor, couriers) = courier_actor::new(buffer);

        // 2. Start them; customers append loyalty rows themselves
        let handles = vec![
            tokio::spawn(order_actor.run(())),
            tokio::spawn(customer_actor.run(loyalty_transactions.clone())),
            tokio::spawn(loyalty_actor.run(())),
            tokio::spawn(cash_actor.run(())),
            tokio::spawn(table_actor.run(())),
            tokio::spawn(courier_actor.run(())),
        ];

        // 3. Wire the orchestrator
        let notifier = Notifier::default();
        let desk = OrderDesk::new(DeskParts {
            orders: orders.clone(),
            tables: tables.clone(),
            customers: customers.clone(),
            directory: CustomerDirectory::new(customers.clone(), notifier.clone()),
            loyalty: LoyaltyLedger::new(
                customers.clone(),
                loyalty_transactions.clone(),
                config.loyalty_enabled,
                config.points_per_unit,
            ),
            cash: CashLedger::new(cash_movements.clone()),
            printer: ReceiptPrinter::new(
                ports.printer,
                config.restaurant_name.clone(),
                config.print_stagger,
            ),
            dispatch: CourierDispatch::new(
                couriers.clone(),
                orders.clone(),
                ports.messenger,
                notifier.clone(),
                config.courier_delay,
            ),
            delivery_fees: ports.delivery_fees,
            notifier: notifier.clone(),
            service_fee_bp: config.service_fee_bp,
        });

        info!(restaurant = %config.restaurant_name, "Desk system started");
        Self {
            orders,
            customers,
            loyalty_transactions,
            cash_movements,
            tables,
            couriers,
            desk,
            notifier,
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            config,
            handles,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// A fresh kiosk session with the configured idle timeout.
    pub fn kiosk_session(&self) -> KioskSession {
        KioskSession::new(self.config.kiosk_idle_timeout, self.notifier.clone())
    }

    /// A debouncer for a channel's phone field.
    pub fn phone_debouncer(&self) -> (PhoneDebouncer, watch::Receiver<Option<String>>) {
        PhoneDebouncer::new(self.config.phone_debounce)
    }

    pub fn session_store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    /// Drop every client and wait for the actors to drain.
    ///
    /// Courier messages still waiting on their delay hold store clients, so shutdown
    /// returns only after they have run.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down desk system...");

        drop(self.desk);
        drop(self.orders);
        drop(self.customers);
        drop(self.loyalty_transactions);
        drop(self.cash_movements);
        drop(self.tables);
        drop(self.couriers);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Desk system shutdown complete.");
        Ok(())
    }
}
