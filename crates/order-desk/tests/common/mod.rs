#![allow(dead_code)]

use order_desk::adapters::{RecordingMessenger, RecordingPrinter, ZoneFeeTable};
use order_desk::cart::Cart;
use order_desk::checkout::DeskParts;
use order_desk::config::DeskConfig;
use order_desk::directory::CustomerDirectory;
use order_desk::dispatch::CourierDispatch;
use order_desk::ledger::{CashLedger, LoyaltyLedger};
use order_desk::lifecycle::{DeskPorts, DeskSystem};
use order_desk::model::{MenuItem, Money, NewOrderItem};
use order_desk::receipt::ReceiptPrinter;
use std::sync::Arc;

pub struct Harness {
    pub system: DeskSystem,
    pub printer: RecordingPrinter,
    pub messenger: RecordingMessenger,
}

/// A full desk on in-memory adapters.
pub fn start(config: DeskConfig) -> Harness {
    let printer = RecordingPrinter::new();
    let messenger = RecordingMessenger::new();
    let ports = DeskPorts {
        printer: Arc::new(printer.clone()),
        messenger: Arc::new(messenger.clone()),
        delivery_fees: Arc::new(
            ZoneFeeTable::new()
                .with_band(3.0, Money::from_reais(5, 0))
                .with_band(8.0, Money::from_reais(9, 0)),
        ),
    };
    Harness {
        system: DeskSystem::new(config, ports),
        printer,
        messenger,
    }
}

/// Parts wired to the harness's own stores, for tests that swap one of them out.
/// Drop the desk built from them before `shutdown`.
pub fn desk_parts(h: &Harness) -> DeskParts {
    let config = h.system.config();
    DeskParts {
        orders: h.system.orders.clone(),
        tables: h.system.tables.clone(),
        customers: h.system.customers.clone(),
        directory: CustomerDirectory::new(h.system.customers.clone(), h.system.notifier.clone()),
        loyalty: LoyaltyLedger::new(
            h.system.customers.clone(),
            h.system.loyalty_transactions.clone(),
            config.loyalty_enabled,
            config.points_per_unit,
        ),
        cash: CashLedger::new(h.system.cash_movements.clone()),
        printer: ReceiptPrinter::new(
            Arc::new(h.printer.clone()),
            config.restaurant_name.clone(),
            config.print_stagger,
        ),
        dispatch: CourierDispatch::new(
            h.system.couriers.clone(),
            h.system.orders.clone(),
            Arc::new(h.messenger.clone()),
            h.system.notifier.clone(),
            config.courier_delay,
        ),
        delivery_fees: Arc::new(ZoneFeeTable::new()),
        notifier: h.system.notifier.clone(),
        service_fee_bp: config.service_fee_bp,
    }
}

pub fn acai() -> MenuItem {
    MenuItem::new(1, "Acai 500ml", Money::from_reais(39, 90))
}

pub fn burger() -> MenuItem {
    MenuItem::new(2, "X-Burger", Money::from_reais(10, 0))
}

pub fn soda() -> MenuItem {
    MenuItem::new(3, "Soda", Money::from_reais(5, 0))
}

pub fn cart_of(item: &MenuItem, quantity: u32) -> Cart {
    let mut cart = Cart::new();
    for _ in 0..quantity {
        cart.add_item(item, &[]).expect("Failed to add item");
    }
    cart
}

pub fn line(item: &MenuItem, quantity: u32) -> NewOrderItem {
    NewOrderItem {
        menu_item_id: item.id,
        name: item.name.clone(),
        quantity,
        unit_price: item.effective_price(),
        notes: None,
    }
}
