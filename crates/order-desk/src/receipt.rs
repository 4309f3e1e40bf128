//! # Receipts
//!
//! Two fixed renderings of an order:
//!
//! - **Kitchen**: items, quantities, notes, a paid/pending badge, the channel badge and a
//!   signature line.
//! - **Customer**: the full money breakdown, customer details, the sequential number and
//!   a barcode-style strip. Always printed as two numbered copies ("vias").
//!
//! Printing happens after the order is persisted. A failure is returned to the caller,
//! who reports it; it never undoes the sale.

use crate::model::{Channel, DeliveryType, Money, Order};
use crate::ports::{PrintError, PrintSurface};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const WIDTH: usize = 40;

/// Number of customer copies.
pub const CUSTOMER_VIAS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptKind {
    Kitchen,
    Customer,
}

/// Copy `index` of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    pub index: u8,
    pub total: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptCustomer {
    pub name: String,
    pub phone: String,
}

/// Extra details printed alongside the order snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptContext {
    pub table_number: Option<u32>,
    pub customer: Option<ReceiptCustomer>,
}

/// Everything a print surface needs to produce one printout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub kind: ReceiptKind,
    pub order: Order,
    pub restaurant_name: String,
    pub table_number: Option<u32>,
    pub customer: Option<ReceiptCustomer>,
    pub via: Option<Via>,
}

impl ReceiptPayload {
    /// Badge shown on both receipts: the order-number prefix wins over the stored channel.
    pub fn channel_badge(&self) -> String {
        let channel = Channel::from_order_number(&self.order.order_number).unwrap_or(self.order.channel);
        match self.order.delivery_type {
            DeliveryType::Delivery => format!("{} / DELIVERY", channel.badge()),
            DeliveryType::Pickup => format!("{} / PICKUP", channel.badge()),
            _ => channel.badge().to_string(),
        }
    }

    /// The printable text; same as the `Display` rendering.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    fn payment_badge(&self) -> &'static str {
        if self.order.is_paid() {
            "PAID"
        } else {
            "PAYMENT PENDING"
        }
    }

    fn write_kitchen(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = &self.order;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "{}", columns("KITCHEN", &format!("[{}]", self.channel_badge())))?;
        writeln!(f, "Order {}", order.order_number)?;
        if let Some(table) = self.table_number {
            writeln!(f, "Table {table}")?;
        }
        writeln!(f, "Status: {}", self.payment_badge())?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for item in &order.items {
            writeln!(f, "{}x {}", item.quantity, item.name)?;
            if let Some(notes) = &item.notes {
                writeln!(f, "   > {notes}")?;
            }
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        if let Some(notes) = &order.notes {
            writeln!(f, "Notes: {notes}")?;
        }
        writeln!(f, "Signature: {}", "_".repeat(WIDTH - 11))
    }

    fn write_customer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = &self.order;
        writeln!(f, "{:^WIDTH$}", self.restaurant_name)?;
        let title = match self.via {
            Some(via) => format!("CUSTOMER RECEIPT - VIA {} OF {}", via.index, via.total),
            None => "CUSTOMER RECEIPT".to_string(),
        };
        writeln!(f, "{title:^WIDTH$}")?;
        writeln!(
            f,
            "{}",
            columns(&format!("Order {}", order.order_number), &format!("#{:05}", order.sequential_number))
        )?;
        let created = order.created_at.format("%d/%m/%Y %H:%M").to_string();
        writeln!(f, "{}", columns(&created, &format!("[{}]", self.channel_badge())))?;
        if let Some(customer) = &self.customer {
            writeln!(f, "Customer: {} ({})", customer.name, customer.phone)?;
        }
        if let Some(table) = self.table_number {
            writeln!(f, "Table {table}")?;
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for item in &order.items {
            let label = format!("{}x {}", item.quantity, item.name);
            writeln!(f, "{}", columns(&label, &item.total_price.to_string()))?;
            writeln!(f, "   {} x {}", item.quantity, item.unit_price)?;
            if let Some(notes) = &item.notes {
                writeln!(f, "   > {notes}")?;
            }
        }
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{}", columns("Subtotal", &order.subtotal.to_string()))?;
        if order.service_fee != Money::ZERO {
            writeln!(f, "{}", columns("Service fee", &order.service_fee.to_string()))?;
        }
        if order.delivery_fee != Money::ZERO {
            writeln!(f, "{}", columns("Delivery fee", &order.delivery_fee.to_string()))?;
        }
        if order.discount != Money::ZERO {
            writeln!(f, "{}", columns("Discount", &format!("-{}", order.discount)))?;
        }
        writeln!(f, "{}", columns("TOTAL", &order.total.to_string()))?;
        if let Some(method) = order.payment_method {
            writeln!(f, "Payment: {method}")?;
        }
        writeln!(f, "Status: {}", self.payment_badge())?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{:^WIDTH$}", barcode(&order.order_number))?;
        writeln!(f, "{:^WIDTH$}", order.order_number)
    }
}

impl fmt::Display for ReceiptPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReceiptKind::Kitchen => self.write_kitchen(f),
            ReceiptKind::Customer => self.write_customer(f),
        }
    }
}

/// Left and right text on one line, padded to the receipt width.
fn columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = WIDTH.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Bar pattern derived from the low nibble of each byte of `key`.
fn barcode(key: &str) -> String {
    key.bytes()
        .flat_map(|b| (0..4).map(move |bit| if (b >> bit) & 1 == 1 { '█' } else { '▌' }))
        .take(WIDTH)
        .collect()
}

/// Renders receipts and sends them to a [`PrintSurface`].
#[derive(Clone)]
pub struct ReceiptPrinter {
    surface: Arc<dyn PrintSurface>,
    restaurant_name: String,
    stagger: Duration,
}

impl ReceiptPrinter {
    /// `stagger` is the pause between customer copies so a single printer never gets two
    /// overlapping jobs.
    pub fn new(surface: Arc<dyn PrintSurface>, restaurant_name: impl Into<String>, stagger: Duration) -> Self {
        Self {
            surface,
            restaurant_name: restaurant_name.into(),
            stagger,
        }
    }

    pub fn payload(
        &self,
        kind: ReceiptKind,
        order: &Order,
        context: &ReceiptContext,
        via: Option<Via>,
    ) -> ReceiptPayload {
        ReceiptPayload {
            kind,
            order: order.clone(),
            restaurant_name: self.restaurant_name.clone(),
            table_number: context.table_number,
            customer: context.customer.clone(),
            via,
        }
    }

    #[instrument(skip_all, fields(order = %order.order_number))]
    pub async fn print_kitchen(&self, order: &Order, context: &ReceiptContext) -> Result<(), PrintError> {
        self.emit(self.payload(ReceiptKind::Kitchen, order, context, None))
            .await?;
        info!("Kitchen ticket printed");
        Ok(())
    }

    /// Print via 1 and via 2, waiting `stagger` in between. Stops at the first failure.
    #[instrument(skip_all, fields(order = %order.order_number))]
    pub async fn print_customer(&self, order: &Order, context: &ReceiptContext) -> Result<(), PrintError> {
        for index in 1..=CUSTOMER_VIAS {
            if index > 1 {
                tokio::time::sleep(self.stagger).await;
            }
            let via = Via {
                index,
                total: CUSTOMER_VIAS,
            };
            self.emit(self.payload(ReceiptKind::Customer, order, context, Some(via)))
                .await?;
            debug!(via = index, "Customer copy printed");
        }
        info!("Customer receipt printed");
        Ok(())
    }

    async fn emit(&self, payload: ReceiptPayload) -> Result<(), PrintError> {
        let document = self.surface.render(&payload).await?;
        self.surface.print(document).await
    }
}
