use super::{
    CheckoutError, CheckoutReport, CounterSale, KioskSale, ReconcileReport, SideEffectWarning,
    TabRequest,
};
use crate::cart::{Cart, CartError};
use crate::clients::{CustomerClient, OrderClient, TableClient};
use crate::directory::CustomerDirectory;
use crate::dispatch::CourierDispatch;
use crate::kiosk::KioskSession;
use crate::ledger::{CashLedger, LoyaltyLedger};
use crate::model::{
    Channel, Customer, DeliveryType, Money, NewOrderItem, Order, OrderCreate, OrderId,
    OrderStatus, PaymentMethod, SideEffect, TableStatus,
};
use crate::notices::{Notice, Notifier};
use crate::ports::DeliveryFeeTable;
use crate::receipt::{ReceiptContext, ReceiptCustomer, ReceiptPrinter};
use crate::table_actor::TableError;
use record_store::ActorClient;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Everything an [`OrderDesk`] is wired from.
pub struct DeskParts {
    pub orders: OrderClient,
    pub tables: TableClient,
    pub customers: CustomerClient,
    pub directory: CustomerDirectory,
    pub loyalty: LoyaltyLedger,
    pub cash: CashLedger,
    pub printer: ReceiptPrinter,
    pub dispatch: CourierDispatch,
    pub delivery_fees: Arc<dyn DeliveryFeeTable>,
    pub notifier: Notifier,
    /// Service fee applied to dine-in tabs, in basis points.
    pub service_fee_bp: u32,
}

/// The order fulfillment orchestrator every channel checks out through.
#[derive(Clone)]
pub struct OrderDesk {
    orders: OrderClient,
    tables: TableClient,
    customers: CustomerClient,
    directory: CustomerDirectory,
    loyalty: LoyaltyLedger,
    cash: CashLedger,
    printer: ReceiptPrinter,
    dispatch: CourierDispatch,
    delivery_fees: Arc<dyn DeliveryFeeTable>,
    notifier: Notifier,
    service_fee_bp: u32,
}

impl OrderDesk {
    pub fn new(parts: DeskParts) -> Self {
        Self {
            orders: parts.orders,
            tables: parts.tables,
            customers: parts.customers,
            directory: parts.directory,
            loyalty: parts.loyalty,
            cash: parts.cash,
            printer: parts.printer,
            dispatch: parts.dispatch,
            delivery_fees: parts.delivery_fees,
            notifier: parts.notifier,
            service_fee_bp: parts.service_fee_bp,
        }
    }

    pub fn directory(&self) -> &CustomerDirectory {
        &self.directory
    }

    pub fn loyalty(&self) -> &LoyaltyLedger {
        &self.loyalty
    }

    pub fn cash(&self) -> &CashLedger {
        &self.cash
    }

    // =========================================================================
    // Counter
    // =========================================================================

    /// Finalize a paid counter sale in one step.
    ///
    /// Resolves the customer, inserts the order already `completed`, then runs the
    /// ledgers, the receipt and (for deliveries with a courier) the courier message.
    /// Only validation and the order insert can fail the sale.
    #[instrument(skip_all, fields(channel = "counter", lines = sale.cart.len()))]
    pub async fn counter_checkout(&self, sale: CounterSale) -> Result<CheckoutReport, CheckoutError> {
        if sale.cart.is_empty() {
            return Err(CartError::Empty.into());
        }
        let details = &sale.customer;
        let name = details.name.as_deref().map(str::trim).unwrap_or_default();
        if details.phone.trim().is_empty() || name.is_empty() {
            return Err(CheckoutError::Validation(
                "counter sales require the customer's name and phone".to_string(),
            ));
        }
        if sale.discount.is_negative() {
            return Err(CheckoutError::Validation(
                "discount must not be negative".to_string(),
            ));
        }
        let delivery_fee = self
            .delivery_fee(sale.delivery_type, sale.delivery_distance_km)
            .await?;

        let customer = self
            .directory
            .resolve(&details.phone, Some(name), details.cpf.as_deref())
            .await?;

        let mut effects = BTreeSet::from([SideEffect::Loyalty, SideEffect::Cash]);
        if sale.print {
            effects.insert(SideEffect::Print);
        }
        if sale.delivery_type == DeliveryType::Delivery && sale.motoboy_id.is_some() {
            effects.insert(SideEffect::Courier);
        }

        let mut params = OrderCreate::new(Channel::Counter, sale.delivery_type, OrderStatus::Completed);
        params.items = sale.cart.to_order_items();
        params.delivery_fee = delivery_fee;
        params.discount = sale.discount;
        params.payment_method = Some(sale.payment_method);
        params.customer_id = customer.as_ref().map(|c| c.id);
        params.motoboy_id = sale.motoboy_id;
        params.notes = sale.notes;
        params.effects = effects;

        let order = self.persist(params).await?;
        Ok(self.follow_up(order, customer).await)
    }

    // =========================================================================
    // Kiosk
    // =========================================================================

    /// Place the kiosk cart as a `preparing` order so the kitchen can start before payment.
    ///
    /// Taking the cart stops the kiosk's idle countdown. If nothing was persisted the cart
    /// goes back to the session; once the order exists the session is reset for the next
    /// customer. No ledger is written until [`confirm_payment`](Self::confirm_payment).
    #[instrument(skip_all, fields(channel = "kiosk"))]
    pub async fn kiosk_checkout(
        &self,
        kiosk: &KioskSession,
        sale: KioskSale,
    ) -> Result<CheckoutReport, CheckoutError> {
        let cart = kiosk.begin_checkout()?;
        match self.place_kiosk_order(&cart, sale).await {
            Ok(report) => {
                kiosk.finish_checkout();
                Ok(report)
            }
            Err(e) if e.is_committed() => {
                kiosk.finish_checkout();
                Err(e)
            }
            Err(e) => {
                debug!(error = %e, "Kiosk checkout failed, cart restored");
                kiosk.abort_checkout(cart);
                Err(e)
            }
        }
    }

    async fn place_kiosk_order(
        &self,
        cart: &Cart,
        sale: KioskSale,
    ) -> Result<CheckoutReport, CheckoutError> {
        let customer = match &sale.customer {
            Some(details) => {
                self.directory
                    .resolve(&details.phone, details.name.as_deref(), details.cpf.as_deref())
                    .await?
            }
            None => None,
        };

        let mut params = OrderCreate::new(Channel::Kiosk, DeliveryType::Counter, OrderStatus::Preparing);
        params.items = cart.to_order_items();
        params.payment_method = Some(sale.payment_method);
        params.customer_id = customer.as_ref().map(|c| c.id);
        params.notes = sale.notes;
        let order = self.persist(params).await?;

        let mut warnings = Vec::new();
        let context = self.receipt_context(&order, customer.as_ref()).await;
        if let Err(e) = self.printer.print_kitchen(&order, &context).await {
            warnings.push(self.report_failure(&order, SideEffect::Print, e.to_string()));
        }

        Ok(CheckoutReport {
            suspicious: customer.as_ref().and_then(Customer::warning),
            order,
            customer,
            warnings,
            courier: None,
        })
    }

    /// The customer paid at the kiosk: complete the order and run its ledgers and receipt.
    pub async fn confirm_payment(&self, order_id: OrderId) -> Result<CheckoutReport, CheckoutError> {
        self.complete_order(order_id, None, true).await
    }

    /// Completion path shared by kiosk confirmation and the POS closing a dine-in tab.
    ///
    /// `payment_method` overrides the one chosen at checkout when given.
    #[instrument(skip(self))]
    pub async fn complete_order(
        &self,
        order_id: OrderId,
        payment_method: Option<PaymentMethod>,
        print: bool,
    ) -> Result<CheckoutReport, CheckoutError> {
        let current = self.orders.fetch(order_id).await?;
        let mut effects = BTreeSet::from([SideEffect::Loyalty, SideEffect::Cash]);
        if print {
            effects.insert(SideEffect::Print);
        }
        if current.delivery_type == DeliveryType::Delivery && current.motoboy_id.is_some() {
            effects.insert(SideEffect::Courier);
        }

        let order = self.orders.complete(order_id, payment_method, effects).await?;
        info!(order_number = %order.order_number, total = %order.total, "Order completed");
        let customer = self.customer_of(&order).await;
        Ok(self.follow_up(order, customer).await)
    }

    // =========================================================================
    // Dine-in tabs
    // =========================================================================

    /// Open a tab at a free table. The order starts `new` with the service fee applied.
    #[instrument(skip_all, fields(channel = "dine_in", table_id = %request.table_id))]
    pub async fn open_tab(&self, request: TabRequest) -> Result<Order, CheckoutError> {
        let table = self
            .tables
            .get(request.table_id)
            .await?
            .ok_or_else(|| TableError::NotFound(request.table_id.to_string()))?;
        if table.status == TableStatus::Occupied {
            return Err(TableError::AlreadyOccupied(table.number).into());
        }

        let customer = match &request.customer {
            Some(details) => {
                self.directory
                    .resolve(&details.phone, details.name.as_deref(), details.cpf.as_deref())
                    .await?
            }
            None => None,
        };

        let mut params = OrderCreate::new(Channel::DineIn, DeliveryType::DineIn, OrderStatus::New);
        params.items = request.items;
        params.service_fee_bp = Some(self.service_fee_bp);
        params.table_id = Some(table.id);
        params.customer_id = customer.as_ref().map(|c| c.id);
        params.notes = request.notes;
        let order = self.persist(params).await?;

        if let Err(e) = self.tables.occupy(table.id, order.id).await {
            warn!(error = %e, "Table was taken meanwhile, canceling tab");
            if let Err(cancel) = self.orders.cancel(order.id).await {
                warn!(error = %cancel, order_id = %order.id, "Could not cancel orphaned tab");
            }
            return Err(e.into());
        }
        info!(table = table.number, order_number = %order.order_number, "Tab opened");
        Ok(order)
    }

    pub async fn append_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Order, CheckoutError> {
        Ok(self.orders.add_items(order_id, items).await?)
    }

    /// A quantity of zero removes the line.
    pub async fn update_item_quantity(
        &self,
        order_id: OrderId,
        line_id: u32,
        quantity: u32,
    ) -> Result<Order, CheckoutError> {
        Ok(self
            .orders
            .update_item_quantity(order_id, line_id, quantity)
            .await?)
    }

    pub async fn update_item_notes(
        &self,
        order_id: OrderId,
        line_id: u32,
        notes: Option<String>,
    ) -> Result<Order, CheckoutError> {
        Ok(self.orders.update_item_notes(order_id, line_id, notes).await?)
    }

    /// Kitchen progress (`confirmed`, `preparing`, `ready`).
    pub async fn advance(&self, order_id: OrderId, to: OrderStatus) -> Result<Order, CheckoutError> {
        Ok(self.orders.transition(order_id, to).await?)
    }

    /// Close the tab for payment and free its table. Safe to repeat.
    #[instrument(skip(self))]
    pub async fn close_tab(&self, order_id: OrderId) -> Result<Order, CheckoutError> {
        let mut order = self.orders.fetch(order_id).await?;
        if order.status != OrderStatus::ReadyForPayment {
            order = self
                .orders
                .transition(order_id, OrderStatus::ReadyForPayment)
                .await?;
        }
        self.release_table(&order).await?;
        info!(order_number = %order.order_number, total = %order.total, "Tab closed");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: OrderId) -> Result<Order, CheckoutError> {
        let order = self.orders.cancel(order_id).await?;
        self.release_table(&order).await?;
        info!(order_number = %order.order_number, "Order canceled");
        Ok(order)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Re-run every side effect still pending on a completed order.
    ///
    /// Ledger writes are idempotent per order, so a step that actually succeeded before a
    /// crash is found rather than repeated. Printing and courier messages get one more
    /// attempt per pass; a courier message already waiting to be sent is left alone.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, CheckoutError> {
        let pending = self.orders.with_pending_effects().await?;
        let mut report = ReconcileReport {
            scanned: pending.len(),
            ..ReconcileReport::default()
        };

        for order in pending {
            let before = order.pending_effects.clone();
            let customer = self.customer_of(&order).await;
            let context = self.receipt_context(&order, customer.as_ref()).await;
            let (order, warnings) = self.run_effects(order, customer.as_ref(), &context).await;

            report
                .repaired
                .extend(before.difference(&order.pending_effects).map(|e| (order.id, *e)));
            report
                .failed
                .extend(warnings.into_iter().map(|w| (order.id, w)));

            if order.pending_effects.contains(&SideEffect::Courier) && !self.dispatch.in_flight(order.id) {
                if let Some(handle) = self.dispatch.notify(&order) {
                    report.couriers.push(handle);
                }
            }
        }

        info!(
            scanned = report.scanned,
            repaired = report.repaired.len(),
            failed = report.failed.len(),
            "Reconciliation pass finished"
        );
        Ok(report)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn persist(&self, params: OrderCreate) -> Result<Order, CheckoutError> {
        let id = self.orders.create_order(params).await?;
        let order = self.orders.fetch(id).await.map_err(|e| {
            warn!(order_id = %id, error = %e, "Order saved but not read back");
            CheckoutError::Unconfirmed {
                order_id: id,
                reason: e.to_string(),
            }
        })?;
        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            status = %order.status,
            total = %order.total,
            "Order persisted"
        );
        Ok(order)
    }

    async fn delivery_fee(
        &self,
        delivery_type: DeliveryType,
        distance_km: Option<f64>,
    ) -> Result<Money, CheckoutError> {
        match (delivery_type, distance_km) {
            (DeliveryType::Delivery, Some(km)) => Ok(self.delivery_fees.fee_for_distance(km).await?),
            _ => Ok(Money::ZERO),
        }
    }

    async fn follow_up(&self, order: Order, customer: Option<Customer>) -> CheckoutReport {
        let context = self.receipt_context(&order, customer.as_ref()).await;
        let (order, warnings) = self.run_effects(order, customer.as_ref(), &context).await;
        let courier = if order.pending_effects.contains(&SideEffect::Courier) {
            self.dispatch.notify(&order)
        } else {
            None
        };
        CheckoutReport {
            suspicious: customer.as_ref().and_then(Customer::warning),
            order,
            customer,
            warnings,
            courier,
        }
    }

    /// Attempt each pending loyalty, cash and print step independently and clear the
    /// marker of every one that succeeds. The courier step is owned by the dispatcher.
    async fn run_effects(
        &self,
        mut order: Order,
        customer: Option<&Customer>,
        context: &ReceiptContext,
    ) -> (Order, Vec<SideEffectWarning>) {
        let mut warnings = Vec::new();
        let pending: Vec<SideEffect> = order
            .pending_effects
            .iter()
            .copied()
            .filter(|effect| *effect != SideEffect::Courier)
            .collect();

        for effect in pending {
            let outcome = match effect {
                SideEffect::Loyalty => self.accrue(&order, customer).await,
                SideEffect::Cash => self
                    .cash
                    .record(&order)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                SideEffect::Print => self
                    .printer
                    .print_customer(&order, context)
                    .await
                    .map_err(|e| e.to_string()),
                SideEffect::Courier => continue,
            };

            match outcome {
                Ok(()) => match self.orders.clear_effect(order.id, effect).await {
                    Ok(updated) => order = updated,
                    Err(e) => warn!(%effect, error = %e, "Could not clear side-effect marker"),
                },
                Err(reason) => warnings.push(self.report_failure(&order, effect, reason)),
            }
        }
        (order, warnings)
    }

    async fn accrue(&self, order: &Order, customer: Option<&Customer>) -> Result<(), String> {
        match (order.customer_id, customer) {
            (None, _) => Ok(()),
            (Some(_), Some(customer)) => self
                .loyalty
                .accrue(order, customer)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            (Some(id), None) => Err(format!("customer {id} could not be loaded")),
        }
    }

    fn report_failure(&self, order: &Order, effect: SideEffect, reason: String) -> SideEffectWarning {
        warn!(order_id = %order.id, %effect, %reason, "Side effect failed");
        let notice = match effect {
            SideEffect::Print => Notice::PrintFailed {
                order_number: order.order_number.clone(),
                reason: reason.clone(),
            },
            SideEffect::Courier => Notice::CourierSendFailed {
                order_number: order.order_number.clone(),
                reason: reason.clone(),
            },
            SideEffect::Loyalty | SideEffect::Cash => Notice::LedgerFailed {
                order_number: order.order_number.clone(),
                effect,
                reason: reason.clone(),
            },
        };
        self.notifier.publish(notice);
        SideEffectWarning::new(effect, reason)
    }

    async fn customer_of(&self, order: &Order) -> Option<Customer> {
        let id = order.customer_id?;
        match self.customers.fetch(id).await {
            Ok(customer) => Some(customer),
            Err(e) => {
                warn!(customer_id = %id, error = %e, "Customer lookup failed");
                None
            }
        }
    }

    async fn receipt_context(&self, order: &Order, customer: Option<&Customer>) -> ReceiptContext {
        let table_number = match order.table_id {
            Some(id) => match self.tables.get(id).await {
                Ok(table) => table.map(|t| t.number),
                Err(e) => {
                    warn!(table_id = %id, error = %e, "Table lookup failed");
                    None
                }
            },
            None => None,
        };
        ReceiptContext {
            table_number,
            customer: customer.map(|c| ReceiptCustomer {
                name: c.name.clone(),
                phone: c.phone.clone(),
            }),
        }
    }

    /// Free the order's table unless another tab has been seated there since.
    async fn release_table(&self, order: &Order) -> Result<(), CheckoutError> {
        let Some(table_id) = order.table_id else {
            return Ok(());
        };
        match self.tables.get(table_id).await? {
            Some(table) if table.order_id == Some(order.id) => {
                self.tables.free(table_id).await?;
                debug!(table = table.number, "Table freed");
            }
            _ => debug!(%table_id, "Table not held by this order"),
        }
        Ok(())
    }
}
