mod common;

use common::{acai, burger, cart_of, desk_parts, line, start, Harness};
use order_desk::checkout::{CheckoutReport, CounterSale, CustomerDetails, OrderDesk, TabRequest};
use order_desk::config::DeskConfig;
use order_desk::customer_actor::CustomerError;
use order_desk::ledger::{CashLedger, LedgerError, LoyaltyLedger};
use order_desk::model::{
    LoyaltyKind, Money, MovementKind, OrderStatus, PaymentMethod, PointsRate, SideEffect,
};
use order_desk::notices::Notice;
use order_desk::{cash_actor, customer_actor, loyalty_actor};
use std::collections::BTreeSet;

async fn counter_sale(h: &Harness, details: CustomerDetails, quantity: u32) -> CheckoutReport {
    let mut sale = CounterSale::new(cart_of(&acai(), quantity), details, PaymentMethod::Pix);
    sale.print = false;
    h.system
        .desk
        .counter_checkout(sale)
        .await
        .expect("Counter checkout failed")
}

fn ana() -> CustomerDetails {
    CustomerDetails::new("11987654321", "Ana Souza").with_cpf("123.456.789-00")
}

#[tokio::test]
async fn test_cash_record_is_idempotent() {
    let h = start(DeskConfig::default());
    let report = counter_sale(&h, ana(), 1).await;

    let first = h.system.desk.cash().record(&report.order).await.expect("Record failed");
    let second = h.system.desk.cash().record(&report.order).await.expect("Record failed");
    assert_eq!(first.id, second.id);
    assert_eq!(first.amount, Money::from_reais(39, 90));
    assert_eq!(
        h.system
            .cash_movements
            .for_order(report.order.id)
            .await
            .expect("List failed")
            .len(),
        1
    );

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_cash_rejects_open_orders_and_records_expenses() {
    let h = start(DeskConfig::default());
    let table_id = h.system.tables.register(1).await.expect("Failed to register table");
    let tab = h
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

    let result = h.system.desk.cash().record(&tab).await;
    assert_eq!(result, Err(LedgerError::NotCompleted(tab.order_number.clone())));

    let expense = h
        .system
        .desk
        .cash()
        .record_expense("supplies", Money::from_reais(80, 0), PaymentMethod::Cash, "Napkins")
        .await
        .expect("Expense failed");
    assert_eq!(expense.order_id, None);
    assert_eq!(expense.category, "supplies");

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_accrual_applies_once_and_audits_clean() {
    let h = start(DeskConfig::default());
    let report = counter_sale(&h, ana(), 2).await;
    let customer = report.customer.expect("Customer should be resolved");

    // 2 × 39.90 = 79.80 → 79 points, already accrued at checkout.
    let retry = h
        .system
        .desk
        .loyalty()
        .accrue(&report.order, &customer)
        .await
        .expect("Accrue failed")
        .expect("Points were owed");
    assert_eq!(retry.points, 79);
    assert_eq!(retry.kind, LoyaltyKind::Earn);

    let audit = h.system.desk.loyalty().audit(customer.id).await.expect("Audit failed");
    assert_eq!(audit.balance, 79);
    assert_eq!(audit.ledger_sum, 79);
    assert!(audit.consistent);

    h.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_no_points_without_tax_id_or_when_disabled() {
    let h = start(DeskConfig::default());
    let report = counter_sale(&h, CustomerDetails::new("11911112222", "Bruno"), 1).await;
    let customer = report.customer.expect("Customer should be resolved");
    assert_eq!(
        h.system.customers.fetch(customer.id).await.expect("Missing").loyalty_points,
        0
    );
    assert!(h
        .system
        .loyalty_transactions
        .for_customer(customer.id)
        .await
        .expect("List failed")
        .is_empty());
    h.system.shutdown().await.expect("Shutdown failed");

    let disabled = start(DeskConfig {
        loyalty_enabled: false,
        ..DeskConfig::default()
    });
    let report = counter_sale(&disabled, ana(), 1).await;
    assert!(report.is_clean());
    assert!(report.order.pending_effects.is_empty());
    let customer = report.customer.expect("Customer should be resolved");
    assert_eq!(
        disabled
            .system
            .customers
            .fetch(customer.id)
            .await
            .expect("Missing")
            .loyalty_points,
        0
    );
    disabled.system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_redeem_cannot_overdraw() {
    let h = start(DeskConfig::default());
    let first = counter_sale(&h, ana(), 1).await;
    let customer_id = first.customer.expect("Customer should be resolved").id;
    let second = counter_sale(&h, ana(), 1).await;

    let overdraw = h
        .system
        .desk
        .loyalty()
        .redeem(second.order.id, customer_id, 500)
        .await;
    assert_eq!(
        overdraw,
        Err(LedgerError::Customer(CustomerError::InsufficientPoints {
            requested: 500,
            available: 78,
        }))
    );

    let redeemed = h
        .system
        .desk
        .loyalty()
        .redeem(second.order.id, customer_id, 50)
        .await
        .expect("Redeem failed");
    assert_eq!(redeemed.balance, 28);
    assert_eq!(redeemed.transaction.signed_points(), -50);

    let audit = h.system.desk.loyalty().audit(customer_id).await.expect("Audit failed");
    assert_eq!(audit.balance, 28);
    assert!(audit.consistent);

    h.system.shutdown().await.expect("Shutdown failed");
}

/// Ledger stores that are down at checkout leave their markers for reconciliation, which
/// writes each row exactly once.
#[tokio::test]
async fn test_failed_ledger_writes_are_reconciled_once() {
    let h = start(DeskConfig::default());
    let mut notices = h.system.notifier.subscribe();

    let (cash_store, closed_cash) = cash_actor::new(4);
    let (loyalty_store, closed_loyalty) = loyalty_actor::new(4);
    let (customer_store, closed_customers) = customer_actor::new(4);
    drop((cash_store, loyalty_store, customer_store));

    let mut parts = desk_parts(&h);
    parts.cash = CashLedger::new(closed_cash);
    parts.loyalty = LoyaltyLedger::new(closed_customers, closed_loyalty, true, PointsRate::ONE);
    let degraded = OrderDesk::new(parts);

    let mut sale = CounterSale::new(cart_of(&acai(), 2), ana(), PaymentMethod::Pix);
    sale.print = false;
    let report = degraded
        .counter_checkout(sale)
        .await
        .expect("Ledger failures must not fail the sale");
    drop(degraded);

    let order = report.order;
    let customer = report.customer.expect("Customer should be resolved");
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(
        order.pending_effects,
        BTreeSet::from([SideEffect::Loyalty, SideEffect::Cash])
    );
    assert_eq!(report.warnings.len(), 2);

    let mut failed = BTreeSet::new();
    while let Ok(notice) = notices.try_recv() {
        if let Notice::LedgerFailed { order_number, effect, .. } = notice {
            assert_eq!(order_number, order.order_number);
            failed.insert(effect);
        }
    }
    assert_eq!(failed, BTreeSet::from([SideEffect::Loyalty, SideEffect::Cash]));

    let reconciled = h.system.desk.reconcile().await.expect("Reconcile failed");
    assert_eq!(reconciled.scanned, 1);
    assert!(reconciled.failed.is_empty());
    assert_eq!(
        reconciled.repaired.iter().map(|(_, e)| *e).collect::<BTreeSet<_>>(),
        BTreeSet::from([SideEffect::Loyalty, SideEffect::Cash])
    );

    let movements = h
        .system
        .cash_movements
        .for_order(order.id)
        .await
        .expect("List failed");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Income);
    assert_eq!(movements[0].amount, order.total);

    let rows = h
        .system
        .loyalty_transactions
        .for_customer(customer.id)
        .await
        .expect("List failed");
    assert_eq!(rows.len(), 1);
    let earn = h
        .system
        .loyalty_transactions
        .find_for_order(LoyaltyKind::Earn, order.id)
        .await
        .expect("Lookup failed")
        .expect("Earn row expected");
    assert_eq!(earn.id, rows[0].id);
    assert_eq!(earn.points, 79);

    let audit = h.system.desk.loyalty().audit(customer.id).await.expect("Audit failed");
    assert!(audit.consistent);
    assert_eq!(audit.balance, 79);

    let idle = h.system.desk.reconcile().await.expect("Reconcile failed");
    assert_eq!(idle.scanned, 0);

    h.system.shutdown().await.expect("Shutdown failed");
}
