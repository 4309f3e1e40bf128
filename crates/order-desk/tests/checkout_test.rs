mod common;

use common::{acai, burger, cart_of, desk_parts, line, soda, start};
use order_desk::cart::Cart;
use order_desk::checkout::{
    CheckoutError, CounterSale, CustomerDetails, KioskSale, OrderDesk, TabRequest,
};
use order_desk::clients::OrderClient;
use order_desk::config::DeskConfig;
use order_desk::model::{
    Channel, Money, MovementKind, Order, OrderId, OrderStatus, PaymentMethod, SideEffect,
    TableStatus, MAX_LINE_QUANTITY,
};
use order_desk::notices::Notice;
use order_desk::receipt::ReceiptKind;
use record_store::mock::MockClient;
use record_store::{ActorClient, FrameworkError};
use std::time::Duration;

fn ana() -> CustomerDetails {
    CustomerDetails::new("11987654321", "Ana Souza").with_cpf("123.456.789-00")
}

/// Kiosk: the order is in the kitchen before payment; ledgers wait for confirmation.
#[tokio::test(start_paused = true)]
async fn test_kiosk_order_prepares_before_payment() {
    let h = start(DeskConfig::default());
    let kiosk = h.system.kiosk_session();
    kiosk
        .interact(|cart| cart.add_item(&acai(), &[]))
        .expect("Kiosk busy")
        .expect("Failed to add item");

    let placed = h
        .system
        .desk
        .kiosk_checkout(
            &kiosk,
            KioskSale {
                customer: Some(ana()),
                payment_method: PaymentMethod::Pix,
                notes: None,
            },
        )
        .await
        .expect("Kiosk checkout failed");

    let order = &placed.order;
    assert_eq!(order.status, OrderStatus::Preparing);
    assert_eq!(order.channel, Channel::Kiosk);
    assert!(order.order_number.starts_with("TOT-"));
    assert_eq!(order.payment_method, Some(PaymentMethod::Pix));
    assert_eq!(order.total, Money::from_reais(39, 90));
    assert!(order.completed_at.is_none());
    assert!(kiosk.cart().is_empty(), "Session should be ready for the next customer");
    assert_eq!(
        h.printer
            .jobs_for(&order.order_number, ReceiptKind::Kitchen)
            .len(),
        1
    );
    assert!(h
        .system
        .cash_movements
        .for_order(order.id)
        .await
        .expect("Failed to list movements")
        .is_empty());

    let paid = h
        .system
        .desk
        .confirm_payment(order.id)
        .await
        .expect("Payment confirmation failed");
    assert!(paid.is_clean(), "Unexpected warnings: {:?}", paid.warnings);
    assert_eq!(paid.order.status, OrderStatus::Completed);
    assert!(paid.order.completed_at.is_some());
    assert!(paid.order.pending_effects.is_empty());

    let movements = h
        .system
        .cash_movements
        .for_order(order.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Income);
    assert_eq!(movements[0].amount, Money::from_reais(39, 90));
    assert_eq!(movements[0].payment_method, PaymentMethod::Pix);

    let customer_id = paid.customer.expect("Customer should be resolved").id;
    let customer = h.system.customers.fetch(customer_id).await.expect("Customer missing");
    assert_eq!(customer.loyalty_points, 39);
    let transactions = h
        .system
        .loyalty_transactions
        .for_customer(customer_id)
        .await
        .expect("Failed to list transactions");
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].points, 39);

    h.system.shutdown().await.expect("Shutdown failed");
}

/// An idle reset clears the kiosk cart but never the order already in the kitchen.
#[tokio::test(start_paused = true)]
async fn test_kiosk_idle_reset_keeps_placed_order() {
    let h = start(DeskConfig::default());
    let mut notices = h.system.notifier.subscribe();
    let kiosk = h.system.kiosk_session();
    kiosk
        .interact(|cart| cart.add_item(&acai(), &[]))
        .expect("Kiosk busy")
        .expect("Failed to add item");

    let placed = h
        .system
        .desk
        .kiosk_checkout(
            &kiosk,
            KioskSale {
                customer: None,
                payment_method: PaymentMethod::Pix,
                notes: None,
            },
        )
        .await
        .expect("Kiosk checkout failed");

    // The next customer starts and walks away.
    kiosk
        .interact(|cart| cart.add_item(&soda(), &[]))
        .expect("Kiosk busy")
        .expect("Failed to add item");
    tokio::time::sleep(Duration::from_secs(121)).await;

    assert!(kiosk.cart().is_empty());
    assert_eq!(notices.recv().await.expect("No notice"), Notice::KioskReset);
    let order = h
        .system
        .orders
        .fetch(placed.order.id)
        .await
        .expect("Order missing");
    assert_eq!(order.status, OrderStatus::Preparing);

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_counter_sale_merges_lines_and_records_once() {
    let h = start(DeskConfig::default());

    let mut cart = cart_of(&burger(), 2);
    cart.add_item(&burger(), &[]).expect("Failed to add item");
    cart.update_quantity(0, 1).expect("Failed to bump quantity");
    assert_eq!(cart.len(), 1);

    let report = h
        .system
        .desk
        .counter_checkout(CounterSale::new(cart, ana(), PaymentMethod::Cash))
        .await
        .expect("Counter checkout failed");

    let order = &report.order;
    assert!(report.is_clean(), "Unexpected warnings: {:?}", report.warnings);
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.order_number.starts_with("PDV-"));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 4);
    assert_eq!(order.subtotal, Money::from_reais(40, 0));
    assert_eq!(order.total, Money::from_reais(40, 0));
    assert!(order.totals_consistent());
    assert!(order.pending_effects.is_empty());

    let vias = h.printer.jobs_for(&order.order_number, ReceiptKind::Customer);
    assert_eq!(vias.len(), 2);
    assert!(vias[1].printed_at - vias[0].printed_at >= Duration::from_millis(500));

    let movements = h
        .system
        .cash_movements
        .for_order(order.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].amount, order.total);
    assert!(movements[0].description.contains(&order.order_number));

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_counter_validation_writes_nothing() {
    let h = start(DeskConfig::default());

    let nameless = CustomerDetails {
        phone: "11987654321".into(),
        name: None,
        cpf: None,
    };
    let result = h
        .system
        .desk
        .counter_checkout(CounterSale::new(cart_of(&burger(), 1), nameless, PaymentMethod::Pix))
        .await;
    assert!(matches!(result, Err(CheckoutError::Validation(_))));

    let result = h
        .system
        .desk
        .counter_checkout(CounterSale::new(Cart::new(), ana(), PaymentMethod::Pix))
        .await;
    assert!(matches!(result, Err(CheckoutError::Validation(_))));

    assert!(h.system.orders.list_all().await.expect("List failed").is_empty());
    assert!(h.system.customers.list_all().await.expect("List failed").is_empty());

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_counter_delivery_fee_from_zone_table() {
    let h = start(DeskConfig::default());

    let mut sale = CounterSale::new(cart_of(&burger(), 2), ana(), PaymentMethod::Pix).delivered(5.0, None);
    sale.print = false;
    let report = h
        .system
        .desk
        .counter_checkout(sale)
        .await
        .expect("Counter checkout failed");

    assert_eq!(report.order.delivery_fee, Money::from_reais(9, 0));
    assert_eq!(report.order.total, Money::from_reais(29, 0));
    assert!(report.courier.is_none(), "No courier was assigned");

    let far = CounterSale::new(cart_of(&burger(), 1), ana(), PaymentMethod::Pix).delivered(40.0, None);
    let result = h.system.desk.counter_checkout(far).await;
    assert!(matches!(result, Err(CheckoutError::Validation(_))));

    h.system.shutdown().await.expect("Shutdown failed");
}

/// Dine-in: every item change recomputes the totals, including the service fee.
#[tokio::test(start_paused = true)]
async fn test_dine_in_tab_recomputes_and_frees_table() {
    let h = start(DeskConfig::default());
    let table_id = h.system.tables.register(7).await.expect("Failed to register table");

    let order = h
        .system
        .desk
        .open_tab(TabRequest {
            table_id,
            customer: None,
            items: vec![line(&burger(), 1)],
            notes: None,
        })
        .await
        .expect("Failed to open tab");
    assert_eq!(order.status, OrderStatus::New);
    assert!(order.order_number.starts_with("MESA-"));
    assert_eq!(order.service_fee, Money::from_reais(1, 0));
    assert_eq!(order.total, Money::from_reais(11, 0));

    let table = h.system.tables.get(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.order_id, Some(order.id));

    let second = h
        .system
        .desk
        .open_tab(TabRequest {
            table_id,
            customer: None,
            items: Vec::new(),
            notes: None,
        })
        .await;
    assert!(matches!(second, Err(CheckoutError::InvalidState(_))));

    let order = h
        .system
        .desk
        .append_items(order.id, vec![line(&soda(), 2)])
        .await
        .expect("Failed to append items");
    assert_eq!(order.subtotal, Money::from_reais(20, 0));
    assert_eq!(order.service_fee, Money::from_reais(2, 0));
    assert_eq!(order.total, Money::from_reais(22, 0));
    assert!(order.totals_consistent());

    let soda_line = order.items[1].line_id;
    let order = h
        .system
        .desk
        .update_item_quantity(order.id, soda_line, 0)
        .await
        .expect("Failed to remove line");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.total, Money::from_reais(11, 0));

    // Recomputing from the same item set never drifts.
    let again = h
        .system
        .desk
        .append_items(order.id, Vec::new())
        .await
        .expect("Failed to recompute");
    assert_eq!(again.total, order.total);

    h.system
        .desk
        .advance(order.id, OrderStatus::Preparing)
        .await
        .expect("Failed to advance");
    let closed = h.system.desk.close_tab(order.id).await.expect("Failed to close tab");
    assert_eq!(closed.status, OrderStatus::ReadyForPayment);
    let table = h.system.tables.get(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Free);

    let locked = h.system.desk.append_items(order.id, vec![line(&soda(), 1)]).await;
    assert!(matches!(locked, Err(CheckoutError::InvalidState(_))));

    let paid = h
        .system
        .desk
        .complete_order(order.id, Some(PaymentMethod::DebitCard), false)
        .await
        .expect("Failed to complete tab");
    assert_eq!(paid.order.status, OrderStatus::Completed);
    let movements = h
        .system
        .cash_movements
        .for_order(order.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].amount, Money::from_reais(11, 0));

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_cancel_tab_frees_table() {
    let h = start(DeskConfig::default());
    let table_id = h.system.tables.register(3).await.expect("Failed to register table");
    let order = h
        .system
        .desk
        .open_tab(TabRequest {
            table_id,
            customer: None,
            items: vec![line(&burger(), 1)],
            notes: None,
        })
        .await
        .expect("Failed to open tab");

    let canceled = h.system.desk.cancel(order.id).await.expect("Failed to cancel");
    assert_eq!(canceled.status, OrderStatus::Canceled);
    let table = h.system.tables.get(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Free);

    let again = h.system.desk.cancel(order.id).await;
    assert!(matches!(again, Err(CheckoutError::InvalidState(_))));

    h.system.shutdown().await.expect("Shutdown failed");
}

/// An oversized quantity is rejected by the order store without taking it down.
#[tokio::test]
async fn test_oversized_append_is_rejected_and_store_survives() {
    let h = start(DeskConfig::default());
    let table_id = h.system.tables.register(9).await.expect("Failed to register table");
    let order = h
        .system
        .desk
        .open_tab(TabRequest {
            table_id,
            customer: None,
            items: vec![line(&burger(), 2)],
            notes: None,
        })
        .await
        .expect("Failed to open tab");

    let overflow = h
        .system
        .desk
        .append_items(order.id, vec![line(&burger(), u32::MAX)])
        .await;
    assert!(matches!(overflow, Err(CheckoutError::Validation(_))));

    let over_cap = h
        .system
        .desk
        .append_items(order.id, vec![line(&burger(), MAX_LINE_QUANTITY - 1)])
        .await;
    assert!(matches!(over_cap, Err(CheckoutError::Validation(_))));

    let line_id = order.items[0].line_id;
    let resize = h
        .system
        .desk
        .update_item_quantity(order.id, line_id, u32::MAX)
        .await;
    assert!(matches!(resize, Err(CheckoutError::Validation(_))));

    let stored = h.system.orders.fetch(order.id).await.expect("Order store went down");
    assert_eq!(stored.items, order.items);
    assert_eq!(stored.total, order.total);

    let grown = h
        .system
        .desk
        .append_items(order.id, vec![line(&burger(), 1)])
        .await
        .expect("Failed to append items");
    assert_eq!(grown.items[0].quantity, 3);

    h.system.shutdown().await.expect("Shutdown failed");
}

/// A create that succeeded is reported as committed even when the read-back fails,
/// so the kiosk does not hand the same cart back for a second order.
#[tokio::test]
async fn test_unreadable_order_after_create_is_not_retryable() {
    let h = start(DeskConfig::default());
    let mut orders = MockClient::<Order>::new();
    orders.expect_create().return_ok(OrderId(41));
    orders.expect_get(OrderId(41)).return_err(FrameworkError::ActorDropped);
    orders.expect_create().return_ok(OrderId(42));
    orders.expect_get(OrderId(42)).return_err(FrameworkError::ActorDropped);

    let mut parts = desk_parts(&h);
    parts.orders = OrderClient::new(orders.client());
    let desk = OrderDesk::new(parts);

    let kiosk = h.system.kiosk_session();
    kiosk
        .interact(|cart| cart.add_item(&acai(), &[]))
        .expect("Kiosk busy")
        .expect("Failed to add item");
    let placed = desk
        .kiosk_checkout(
            &kiosk,
            KioskSale {
                customer: None,
                payment_method: PaymentMethod::Pix,
                notes: None,
            },
        )
        .await;
    let err = placed.expect_err("Read-back failure must surface");
    assert!(err.is_committed());
    assert!(matches!(
        err,
        CheckoutError::Unconfirmed { order_id: OrderId(41), .. }
    ));
    assert!(kiosk.cart().is_empty());

    let mut sale = CounterSale::new(cart_of(&burger(), 1), ana(), PaymentMethod::Pix);
    sale.print = false;
    let counter = desk.counter_checkout(sale).await;
    assert!(matches!(
        counter,
        Err(CheckoutError::Unconfirmed { order_id: OrderId(42), .. })
    ));

    orders.verify();
    drop(desk);
    h.system.shutdown().await.expect("Shutdown failed");
}

/// A printer outage does not undo the sale; reconciliation prints it later.
#[tokio::test(start_paused = true)]
async fn test_print_failure_is_reconciled() {
    let h = start(DeskConfig::default());
    let mut notices = h.system.notifier.subscribe();
    h.printer.set_failing(true);

    let report = h
        .system
        .desk
        .counter_checkout(CounterSale::new(cart_of(&burger(), 1), ana(), PaymentMethod::Pix))
        .await
        .expect("A print failure must not fail the sale");

    assert_eq!(report.order.status, OrderStatus::Completed);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].effect, SideEffect::Print);
    assert!(report.order.pending_effects.contains(&SideEffect::Print));
    assert!(!report.order.pending_effects.contains(&SideEffect::Cash));
    assert!(matches!(
        notices.recv().await.expect("No notice"),
        Notice::PrintFailed { .. }
    ));

    h.printer.set_failing(false);
    let reconciled = h.system.desk.reconcile().await.expect("Reconcile failed");
    assert_eq!(reconciled.scanned, 1);
    assert_eq!(reconciled.repaired, vec![(report.order.id, SideEffect::Print)]);
    assert!(reconciled.failed.is_empty());
    assert_eq!(
        h.printer
            .jobs_for(&report.order.order_number, ReceiptKind::Customer)
            .len(),
        2
    );

    let idle = h.system.desk.reconcile().await.expect("Reconcile failed");
    assert_eq!(idle.scanned, 0);
    let movements = h
        .system
        .cash_movements
        .for_order(report.order.id)
        .await
        .expect("Failed to list movements");
    assert_eq!(movements.len(), 1);

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_suspicious_customer_is_advisory() {
    let h = start(DeskConfig::default());
    let mut notices = h.system.notifier.subscribe();

    let first = h
        .system
        .desk
        .counter_checkout({
            let mut sale = CounterSale::new(cart_of(&burger(), 1), ana(), PaymentMethod::Pix);
            sale.print = false;
            sale
        })
        .await
        .expect("Counter checkout failed");
    let customer_id = first.customer.expect("Customer should be resolved").id;
    h.system
        .customers
        .mark_suspicious(customer_id, "chargeback last month")
        .await
        .expect("Failed to flag customer");

    let mut sale = CounterSale::new(cart_of(&burger(), 1), ana(), PaymentMethod::Pix);
    sale.print = false;
    let second = h
        .system
        .desk
        .counter_checkout(sale)
        .await
        .expect("A suspicious customer must not block the sale");

    assert_eq!(second.suspicious.as_deref(), Some("chargeback last month"));
    assert_eq!(second.order.status, OrderStatus::Completed);
    assert!(matches!(
        notices.recv().await.expect("No notice"),
        Notice::SuspiciousCustomer { .. }
    ));

    h.system.shutdown().await.expect("Shutdown failed");
}
