//! The `Order` aggregate: one row per sale with its line items embedded.
//!
//! # Record Store
//! `Order` implements [`ActorEntity`](record_store::ActorEntity) in
//! [`order_actor`](crate::order_actor). Items live inside the order row, so an order and
//! its items are always written together and the store's single-row atomicity covers both.
//!
//! # Totals
//! `subtotal = Σ item.total_price` and
//! `total = subtotal − discount + service_fee + delivery_fee`. Every mutation that touches
//! items or fees ends in [`Order::recompute`], which derives both from the current item set
//! alone and is therefore idempotent.
use super::{CourierId, CustomerId, MenuItemId, Money, TableId};
use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

record_id!(
    /// Type-safe identifier for Orders. Doubles as the receipt's sequential number.
    OrderId,
    "order"
);

/// The sales surface an order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Counter,
    Kiosk,
    DineIn,
    Online,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Counter,
        Channel::Kiosk,
        Channel::DineIn,
        Channel::Online,
    ];

    /// Order-number prefix. External reports key off these, keep them stable.
    pub fn prefix(self) -> &'static str {
        match self {
            Channel::Counter => "PDV",
            Channel::Kiosk => "TOT",
            Channel::DineIn => "MESA",
            Channel::Online => "WEB",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Channel::Counter => "COUNTER",
            Channel::Kiosk => "KIOSK",
            Channel::DineIn => "DINE-IN",
            Channel::Online => "ONLINE",
        }
    }

    /// `PDV-00042` for the 42nd order, when sold at the counter.
    pub fn order_number(self, sequential: u32) -> String {
        format!("{}-{:05}", self.prefix(), sequential)
    }

    /// Recover the channel from a formatted order number.
    pub fn from_order_number(number: &str) -> Option<Channel> {
        let (prefix, _) = number.split_once('-')?;
        Channel::ALL.into_iter().find(|c| c.prefix() == prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryType {
    Counter,
    DineIn,
    Pickup,
    Delivery,
}

/// Order lifecycle.
///
/// `New → Confirmed → Preparing → Ready → ReadyForPayment → Completed`, moving forward
/// only (steps may be skipped). `Canceled` is reachable from every state except
/// `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Confirmed,
    Preparing,
    Ready,
    ReadyForPayment,
    Completed,
    Canceled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::New => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::Ready => 3,
            OrderStatus::ReadyForPayment => 4,
            OrderStatus::Completed => 5,
            OrderStatus::Canceled => 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }

    /// Items may be appended or edited only while the kitchen can still act on them.
    pub fn accepts_item_edits(self) -> bool {
        matches!(
            self,
            OrderStatus::New | OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        match next {
            OrderStatus::Canceled => !self.is_terminal(),
            _ => !self.is_terminal() && next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::New => "new",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::ReadyForPayment => "ready_for_payment",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Pix,
    Cash,
    CreditCard,
    DebitCard,
    Voucher,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Voucher => "Meal voucher",
        };
        f.write_str(s)
    }
}

/// The follow-up work owed by a completed order. Each marker is cleared once its step
/// succeeds; anything left is picked up by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SideEffect {
    Loyalty,
    Cash,
    Print,
    Courier,
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SideEffect::Loyalty => "loyalty",
            SideEffect::Cash => "cash",
            SideEffect::Print => "print",
            SideEffect::Courier => "courier",
        };
        f.write_str(s)
    }
}

/// A priced line. `name` and `unit_price` are snapshots taken at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub line_id: u32,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub notes: Option<String>,
}

impl OrderItem {
    fn same_line(&self, item: &NewOrderItem) -> bool {
        self.menu_item_id == item.menu_item_id
            && self.unit_price == item.unit_price
            && self.notes == item.notes
    }
}

/// Largest quantity a single order line may carry.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest unit price a line may carry (R$ 1.000.000,00).
pub const MAX_UNIT_PRICE: Money = Money::from_reais(1_000_000, 0);

fn line_total(unit_price: Money, quantity: u32, name: &str) -> Result<Money, OrderError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(OrderError::InvalidQuantity(name.to_string()));
    }
    unit_price
        .times(quantity)
        .ok_or(OrderError::AmountOutOfRange)
}

/// A line to add to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub notes: Option<String>,
}

impl NewOrderItem {
    fn validate(&self) -> Result<(), OrderError> {
        if self.quantity == 0 || self.quantity > MAX_LINE_QUANTITY {
            return Err(OrderError::InvalidQuantity(self.name.clone()));
        }
        if self.unit_price.is_negative() || self.unit_price > MAX_UNIT_PRICE {
            return Err(OrderError::ValidationError(format!(
                "unit price out of range for {}",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub channel: Channel,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    next_line_id: u32,
    pub subtotal: Money,
    pub service_fee: Money,
    /// Service-fee rate re-applied on every recompute (dine-in tabs).
    pub service_fee_bp: Option<u32>,
    pub delivery_fee: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: Option<PaymentMethod>,
    pub customer_id: Option<CustomerId>,
    pub table_id: Option<TableId>,
    pub motoboy_id: Option<CourierId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sequential_number: u32,
    pub pending_effects: BTreeSet<SideEffect>,
}

/// Payload for inserting an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub channel: Channel,
    pub delivery_type: DeliveryType,
    /// One of `New`, `Confirmed`, `Preparing` or `Completed`.
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
    pub service_fee_bp: Option<u32>,
    pub delivery_fee: Money,
    pub discount: Money,
    pub payment_method: Option<PaymentMethod>,
    pub customer_id: Option<CustomerId>,
    pub table_id: Option<TableId>,
    pub motoboy_id: Option<CourierId>,
    pub notes: Option<String>,
    /// Recorded only when the order is inserted already completed.
    pub effects: BTreeSet<SideEffect>,
}

impl OrderCreate {
    /// A bare order for `channel`; adjust the public fields from there.
    pub fn new(channel: Channel, delivery_type: DeliveryType, status: OrderStatus) -> Self {
        Self {
            channel,
            delivery_type,
            status,
            items: Vec::new(),
            service_fee_bp: None,
            delivery_fee: Money::ZERO,
            discount: Money::ZERO,
            payment_method: None,
            customer_id: None,
            table_id: None,
            motoboy_id: None,
            notes: None,
            effects: BTreeSet::new(),
        }
    }
}

/// Adjustments to an open order. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub notes: Option<String>,
    pub discount: Option<Money>,
    pub delivery_fee: Option<Money>,
    pub motoboy_id: Option<CourierId>,
}

impl Order {
    /// Build a new order row from its create payload.
    pub fn open(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if !matches!(
            params.status,
            OrderStatus::New | OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Completed
        ) {
            return Err(OrderError::InvalidInitialStatus(params.status));
        }
        if params.discount.is_negative() || params.delivery_fee.is_negative() {
            return Err(OrderError::ValidationError(
                "discount and delivery fee must not be negative".into(),
            ));
        }

        let now = Utc::now();
        let mut order = Self {
            id,
            order_number: params.channel.order_number(id.0),
            channel: params.channel,
            delivery_type: params.delivery_type,
            status: params.status,
            items: Vec::new(),
            next_line_id: 1,
            subtotal: Money::ZERO,
            service_fee: Money::ZERO,
            service_fee_bp: params.service_fee_bp,
            delivery_fee: params.delivery_fee,
            discount: params.discount,
            total: Money::ZERO,
            payment_method: params.payment_method,
            customer_id: params.customer_id,
            table_id: params.table_id,
            motoboy_id: params.motoboy_id,
            notes: params.notes,
            created_at: now,
            completed_at: None,
            sequential_number: id.0,
            pending_effects: BTreeSet::new(),
        };
        for item in params.items {
            item.validate()?;
            order.merge_item(item)?;
        }
        order.recompute()?;
        order.ensure_non_negative_total()?;

        if order.status == OrderStatus::Completed {
            if order.payment_method.is_none() {
                return Err(OrderError::MissingPayment(order.order_number));
            }
            order.completed_at = Some(now);
            order.pending_effects = params.effects;
        }
        Ok(order)
    }

    /// Re-derive subtotal, service fee and total from the current items.
    ///
    /// Fails with `AmountOutOfRange` instead of overflowing; the caller's draft is then
    /// discarded by the store.
    pub fn recompute(&mut self) -> Result<(), OrderError> {
        let subtotal = self
            .items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.total_price))
            .ok_or(OrderError::AmountOutOfRange)?;
        if let Some(bp) = self.service_fee_bp {
            self.service_fee = subtotal.basis_points(bp);
        }
        let total = subtotal
            .checked_sub(self.discount)
            .and_then(|t| t.checked_add(self.service_fee))
            .and_then(|t| t.checked_add(self.delivery_fee))
            .ok_or(OrderError::AmountOutOfRange)?;
        self.subtotal = subtotal;
        self.total = total;
        Ok(())
    }

    /// Whether the stored totals agree with the items and fees.
    pub fn totals_consistent(&self) -> bool {
        let subtotal: Money = self.items.iter().map(|item| item.total_price).sum();
        let lines_ok = self
            .items
            .iter()
            .all(|item| item.quantity >= 1 && item.unit_price.times(item.quantity) == Some(item.total_price));
        lines_ok
            && self.subtotal == subtotal
            && self.total == self.subtotal - self.discount + self.service_fee + self.delivery_fee
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    pub fn item(&self, line_id: u32) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.line_id == line_id)
    }

    /// Append lines, folding each into an identical existing line when there is one.
    pub fn add_items(&mut self, items: Vec<NewOrderItem>) -> Result<(), OrderError> {
        self.ensure_items_editable()?;
        for item in &items {
            item.validate()?;
        }
        for item in items {
            self.merge_item(item)?;
        }
        self.recompute()?;
        self.ensure_non_negative_total()
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_item_quantity(&mut self, line_id: u32, quantity: u32) -> Result<(), OrderError> {
        self.ensure_items_editable()?;
        let index = self.line_index(line_id)?;
        if quantity == 0 {
            self.items.remove(index);
        } else {
            let item = &mut self.items[index];
            item.total_price = line_total(item.unit_price, quantity, &item.name)?;
            item.quantity = quantity;
        }
        self.recompute()?;
        self.ensure_non_negative_total()
    }

    pub fn set_item_notes(&mut self, line_id: u32, notes: Option<String>) -> Result<(), OrderError> {
        self.ensure_items_editable()?;
        let index = self.line_index(line_id)?;
        self.items[index].notes = notes.filter(|n| !n.trim().is_empty());
        self.recompute()
    }

    pub fn apply_update(&mut self, update: OrderUpdate) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::Closed(self.order_number.clone(), self.status));
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(discount) = update.discount {
            if discount.is_negative() {
                return Err(OrderError::ValidationError("negative discount".into()));
            }
            self.discount = discount;
        }
        if let Some(fee) = update.delivery_fee {
            if fee.is_negative() {
                return Err(OrderError::ValidationError("negative delivery fee".into()));
            }
            self.delivery_fee = fee;
        }
        if let Some(motoboy) = update.motoboy_id {
            self.motoboy_id = Some(motoboy);
        }
        self.recompute()?;
        self.ensure_non_negative_total()
    }

    /// Move forward to one of the intermediate states.
    pub fn advance(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if to.is_terminal() || !self.status.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Complete the sale and record which follow-up steps are owed.
    pub fn complete(
        &mut self,
        payment_method: Option<PaymentMethod>,
        effects: BTreeSet<SideEffect>,
    ) -> Result<(), OrderError> {
        if !self.status.can_transition_to(OrderStatus::Completed) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Completed,
            });
        }
        if let Some(method) = payment_method {
            self.payment_method = Some(method);
        }
        if self.payment_method.is_none() {
            return Err(OrderError::MissingPayment(self.order_number.clone()));
        }
        self.status = OrderStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.pending_effects = effects;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_transition_to(OrderStatus::Canceled) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Canceled,
            });
        }
        self.status = OrderStatus::Canceled;
        Ok(())
    }

    fn merge_item(&mut self, item: NewOrderItem) -> Result<(), OrderError> {
        if let Some(line) = self.items.iter_mut().find(|line| line.same_line(&item)) {
            let quantity = line
                .quantity
                .checked_add(item.quantity)
                .ok_or_else(|| OrderError::InvalidQuantity(item.name.clone()))?;
            line.total_price = line_total(line.unit_price, quantity, &line.name)?;
            line.quantity = quantity;
            return Ok(());
        }
        let line_id = self.next_line_id;
        self.next_line_id = self
            .next_line_id
            .checked_add(1)
            .ok_or_else(|| OrderError::ValidationError("too many order lines".into()))?;
        self.items.push(OrderItem {
            line_id,
            menu_item_id: item.menu_item_id,
            total_price: line_total(item.unit_price, item.quantity, &item.name)?,
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            notes: item.notes,
        });
        Ok(())
    }

    fn line_index(&self, line_id: u32) -> Result<usize, OrderError> {
        self.items
            .iter()
            .position(|item| item.line_id == line_id)
            .ok_or(OrderError::LineNotFound(line_id))
    }

    fn ensure_items_editable(&self) -> Result<(), OrderError> {
        if self.status.accepts_item_edits() {
            Ok(())
        } else {
            Err(OrderError::ItemsLocked(self.order_number.clone(), self.status))
        }
    }

    fn ensure_non_negative_total(&self) -> Result<(), OrderError> {
        if self.total.is_negative() {
            return Err(OrderError::NegativeTotal(self.total));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burger(quantity: u32) -> NewOrderItem {
        NewOrderItem {
            menu_item_id: MenuItemId(1),
            name: "X-Burger".into(),
            quantity,
            unit_price: Money::from_reais(10, 0),
            notes: None,
        }
    }

    fn tab() -> Order {
        let mut params = OrderCreate::new(Channel::DineIn, DeliveryType::DineIn, OrderStatus::New);
        params.service_fee_bp = Some(1000);
        Order::open(OrderId(7), params).unwrap()
    }

    #[test]
    fn test_order_number_round_trips_channel() {
        for channel in Channel::ALL {
            let number = channel.order_number(42);
            assert_eq!(Channel::from_order_number(&number), Some(channel));
        }
        assert_eq!(Channel::Kiosk.order_number(3), "TOT-00003");
        assert_eq!(Channel::from_order_number("XYZ-1"), None);
        assert_eq!(Channel::from_order_number("PDV"), None);
    }

    #[test]
    fn test_status_moves_forward_only() {
        use OrderStatus::*;
        assert!(New.can_transition_to(Preparing));
        assert!(Ready.can_transition_to(ReadyForPayment));
        assert!(!Preparing.can_transition_to(Confirmed));
        assert!(!Preparing.can_transition_to(Preparing));
        assert!(ReadyForPayment.can_transition_to(Canceled));
        assert!(!Completed.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Completed));
    }

    #[test]
    fn test_items_merge_and_recompute() {
        let mut order = tab();
        order.add_items(vec![burger(2)]).unwrap();
        order.add_items(vec![burger(1)]).unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.subtotal, Money::from_reais(30, 0));
        assert_eq!(order.service_fee, Money::from_reais(3, 0));
        assert_eq!(order.total, Money::from_reais(33, 0));
        assert!(order.totals_consistent());

        let mut noted = burger(1);
        noted.notes = Some("no onions".into());
        order.add_items(vec![noted]).unwrap();
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut order = tab();
        order.add_items(vec![burger(3)]).unwrap();
        let before = order.clone();
        order.recompute().unwrap();
        order.recompute().unwrap();
        assert_eq!(order, before);
    }

    #[test]
    fn test_quantity_zero_removes_line() {
        let mut order = tab();
        order.add_items(vec![burger(2)]).unwrap();
        let line = order.items[0].line_id;

        order.set_item_quantity(line, 5).unwrap();
        assert_eq!(order.subtotal, Money::from_reais(50, 0));

        order.set_item_quantity(line, 0).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.total, Money::ZERO);
        assert_eq!(order.set_item_quantity(line, 1), Err(OrderError::LineNotFound(line)));
    }

    #[test]
    fn test_oversized_quantities_are_rejected() {
        let mut order = tab();
        order.add_items(vec![burger(2)]).unwrap();
        let before = order.clone();
        let line = order.items[0].line_id;

        assert_eq!(
            order.add_items(vec![burger(u32::MAX)]),
            Err(OrderError::InvalidQuantity("X-Burger".into()))
        );
        assert_eq!(
            order.add_items(vec![burger(MAX_LINE_QUANTITY)]),
            Err(OrderError::InvalidQuantity("X-Burger".into()))
        );
        assert_eq!(
            order.set_item_quantity(line, u32::MAX),
            Err(OrderError::InvalidQuantity("X-Burger".into()))
        );
        assert_eq!(order, before);

        order.add_items(vec![burger(MAX_LINE_QUANTITY - 2)]).unwrap();
        assert_eq!(order.items[0].quantity, MAX_LINE_QUANTITY);
        assert!(order.totals_consistent());
    }

    #[test]
    fn test_out_of_range_amounts_are_rejected() {
        let mut pricey = burger(1);
        pricey.unit_price = Money::from_cents(i64::MAX);
        let mut params = OrderCreate::new(Channel::Counter, DeliveryType::Counter, OrderStatus::New);
        params.items = vec![pricey];
        assert!(matches!(
            Order::open(OrderId(1), params),
            Err(OrderError::ValidationError(_))
        ));

        let mut params = OrderCreate::new(Channel::Counter, DeliveryType::Delivery, OrderStatus::New);
        params.items = vec![burger(1)];
        params.delivery_fee = Money::from_cents(i64::MAX);
        assert_eq!(Order::open(OrderId(2), params), Err(OrderError::AmountOutOfRange));
    }

    #[test]
    fn test_items_locked_after_close() {
        let mut order = tab();
        order.add_items(vec![burger(1)]).unwrap();
        order.advance(OrderStatus::ReadyForPayment).unwrap();
        assert!(matches!(
            order.add_items(vec![burger(1)]),
            Err(OrderError::ItemsLocked(_, OrderStatus::ReadyForPayment))
        ));
    }

    #[test]
    fn test_complete_requires_payment() {
        let mut order = tab();
        order.add_items(vec![burger(1)]).unwrap();
        assert!(matches!(
            order.complete(None, BTreeSet::new()),
            Err(OrderError::MissingPayment(_))
        ));
        order
            .complete(Some(PaymentMethod::Pix), BTreeSet::from([SideEffect::Cash]))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completed_at.is_some());
        assert!(order.cancel().is_err());
    }

    #[test]
    fn test_discount_cannot_push_total_negative() {
        let mut params = OrderCreate::new(Channel::Counter, DeliveryType::Counter, OrderStatus::New);
        params.items = vec![burger(1)];
        params.discount = Money::from_reais(11, 0);
        assert!(matches!(
            Order::open(OrderId(1), params),
            Err(OrderError::NegativeTotal(_))
        ));
    }
}
