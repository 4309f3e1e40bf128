//! # Order Desk demo
//!
//! Runs one restaurant shift end to end against in-memory adapters:
//!
//! 1. A counter delivery sale, paid at once, with a courier message.
//! 2. A kiosk sale placed as `preparing`, then paid.
//! 3. A dine-in tab opened, extended, closed and completed at the POS.
//! 4. A reconciliation pass over whatever side effects are still pending.
//!
//! `RUST_LOG=info cargo run` shows the flow; `debug` adds every store request.

use order_desk::adapters::{RecordingMessenger, RecordingPrinter, StaticCatalog, ZoneFeeTable};
use order_desk::cart::Cart;
use order_desk::checkout::{CounterSale, CustomerDetails, KioskSale, TabRequest};
use order_desk::config::DeskConfig;
use order_desk::lifecycle::{setup_tracing, DeskPorts, DeskSystem};
use order_desk::model::{
    CourierCreate, Customization, MenuItem, MenuItemId, Money, OrderStatus, PaymentMethod,
};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

fn menu() -> StaticCatalog {
    let acai = MenuItem::new(1, "Acai 500ml", Money::from_reais(39, 90)).with_category("bowls");
    let burger = MenuItem::new(2, "X-Burger", Money::from_reais(25, 0)).with_category("burgers");
    let soda = MenuItem::new(3, "Soda", Money::from_reais(6, 0))
        .with_promotion(Money::from_reais(5, 0))
        .with_category("drinks");
    let extras = vec![
        Customization::new(1, burger.id, "Bacon", Money::from_reais(4, 0)),
        Customization::new(2, burger.id, "No onions", Money::ZERO),
    ];
    StaticCatalog::new()
        .with_item(acai, Vec::new())
        .with_item(burger, extras)
        .with_item(soda, Vec::new())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    info!("Starting order desk demo");

    let catalog = menu();
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
    let system = DeskSystem::new(DeskConfig::from_env(), ports);
    let mut notices = system.notifier.subscribe();

    let courier_id = system
        .couriers
        .register(CourierCreate {
            name: "Joao".to_string(),
            phone: Some("11955550000".to_string()),
        })
        .await
        .map_err(|e| e.to_string())?;
    let table_id = system.tables.register(7).await.map_err(|e| e.to_string())?;

    // 1. Counter delivery sale
    let span = info_span!("counter_sale");
    let counter = async {
        let mut cart = Cart::new();
        for _ in 0..2 {
            cart.add_from_catalog(&catalog, MenuItemId(2), &[])
                .await
                .map_err(|e| e.to_string())?;
        }
        cart.add_from_catalog(&catalog, MenuItemId(3), &[])
            .await
            .map_err(|e| e.to_string())?;

        let customer = CustomerDetails::new("11987654321", "Ana Souza").with_cpf("123.456.789-00");
        let sale = CounterSale::new(cart, customer, PaymentMethod::CreditCard)
            .delivered(2.5, Some(courier_id));
        system
            .desk
            .counter_checkout(sale)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(
        order_number = %counter.order.order_number,
        total = %counter.order.total,
        warnings = counter.warnings.len(),
        "Counter sale finished"
    );

    // 2. Kiosk sale, kitchen starts before payment
    let kiosk = system.kiosk_session();
    let span = info_span!("kiosk_sale");
    let kiosk_order = async {
        kiosk
            .interact(|cart| cart.add_item(&MenuItem::new(1, "Acai 500ml", Money::from_reais(39, 90)), &[]))
            .map_err(|e| e.to_string())?
            .map_err(|e| e.to_string())?;
        let sale = KioskSale {
            customer: Some(CustomerDetails::new("11987654321", "Ana Souza")),
            payment_method: PaymentMethod::Pix,
            notes: None,
        };
        let placed = system
            .desk
            .kiosk_checkout(&kiosk, sale)
            .await
            .map_err(|e| e.to_string())?;
        info!(order_number = %placed.order.order_number, status = %placed.order.status, "Kiosk order placed");
        system
            .desk
            .confirm_payment(placed.order.id)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(
        order_number = %kiosk_order.order.order_number,
        status = %kiosk_order.order.status,
        "Kiosk payment confirmed"
    );

    // 3. Dine-in tab
    let span = info_span!("dine_in_tab");
    let tab = async {
        let mut first_round = Cart::new();
        first_round
            .add_from_catalog(&catalog, MenuItemId(2), &[])
            .await
            .map_err(|e| e.to_string())?;
        let order = system
            .desk
            .open_tab(TabRequest {
                table_id,
                customer: None,
                items: first_round.to_order_items(),
                notes: None,
            })
            .await
            .map_err(|e| e.to_string())?;

        let mut second_round = Cart::new();
        second_round
            .add_from_catalog(&catalog, MenuItemId(3), &[])
            .await
            .map_err(|e| e.to_string())?;
        let order = system
            .desk
            .append_items(order.id, second_round.to_order_items())
            .await
            .map_err(|e| e.to_string())?;
        info!(subtotal = %order.subtotal, service_fee = %order.service_fee, total = %order.total, "Tab updated");

        system
            .desk
            .advance(order.id, OrderStatus::Preparing)
            .await
            .map_err(|e| e.to_string())?;
        let closed = system.desk.close_tab(order.id).await.map_err(|e| e.to_string())?;
        system
            .desk
            .complete_order(closed.id, Some(PaymentMethod::DebitCard), true)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(order_number = %tab.order.order_number, total = %tab.order.total, "Tab paid");

    if let Some(courier) = counter.courier {
        match courier.await {
            Ok(Ok(())) => info!("Courier notified"),
            Ok(Err(e)) => warn!(error = %e, "Courier notification failed"),
            Err(e) => error!(error = %e, "Courier task failed"),
        }
    }

    // 4. Reconciliation
    let report = system.desk.reconcile().await.map_err(|e| e.to_string())?;
    info!(
        scanned = report.scanned,
        repaired = report.repaired.len(),
        failed = report.failed.len(),
        "Reconciliation done"
    );

    while let Ok(notice) = notices.try_recv() {
        info!(?notice, "Operator notice");
    }
    info!(
        print_jobs = printer.jobs().len(),
        messages = messenger.sent().len(),
        "Shift summary"
    );

    system.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
