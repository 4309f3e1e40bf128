use async_trait::async_trait;
use order_desk::adapters::RecordingPrinter;
use order_desk::model::{
    Channel, DeliveryType, MenuItemId, Money, NewOrderItem, Order, OrderCreate, OrderId,
    OrderStatus, PaymentMethod,
};
use order_desk::ports::{DocumentHandle, PrintError, PrintSurface};
use order_desk::receipt::{
    ReceiptContext, ReceiptCustomer, ReceiptKind, ReceiptPayload, ReceiptPrinter, Via,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn order(status: OrderStatus) -> Order {
    let mut params = OrderCreate::new(Channel::Counter, DeliveryType::Delivery, status);
    params.payment_method = Some(PaymentMethod::CreditCard);
    params.delivery_fee = Money::from_reais(5, 0);
    params.items = vec![NewOrderItem {
        menu_item_id: MenuItemId(2),
        name: "X-Burger".into(),
        quantity: 3,
        unit_price: Money::from_reais(25, 0),
        notes: None,
    }];
    Order::open(OrderId(12), params).expect("Failed to open order")
}

fn context() -> ReceiptContext {
    ReceiptContext {
        table_number: None,
        customer: Some(ReceiptCustomer {
            name: "Ana Souza".into(),
            phone: "11987654321".into(),
        }),
    }
}

#[tokio::test(start_paused = true)]
async fn test_customer_vias_are_staggered() {
    let surface = RecordingPrinter::new();
    let printer = ReceiptPrinter::new(Arc::new(surface.clone()), "Casa do Acai", Duration::from_millis(500));
    let order = order(OrderStatus::Completed);

    printer
        .print_customer(&order, &context())
        .await
        .expect("Print failed");

    let jobs = surface.jobs_for(&order.order_number, ReceiptKind::Customer);
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].via, Some(Via { index: 1, total: 2 }));
    assert_eq!(jobs[1].via, Some(Via { index: 2, total: 2 }));
    assert!(jobs[1].printed_at - jobs[0].printed_at >= Duration::from_millis(500));
    assert!(jobs[0].text.contains("Casa do Acai"));
    assert!(jobs[0].text.contains("R$ 80,00"));
}

#[tokio::test]
async fn test_kitchen_ticket_is_single_copy() {
    let surface = RecordingPrinter::new();
    let printer = ReceiptPrinter::new(Arc::new(surface.clone()), "Casa do Acai", Duration::from_millis(500));
    let order = order(OrderStatus::Preparing);

    printer
        .print_kitchen(&order, &ReceiptContext::default())
        .await
        .expect("Print failed");

    let jobs = surface.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].kind, ReceiptKind::Kitchen);
    assert_eq!(jobs[0].via, None);
    assert!(jobs[0].text.contains("3x X-Burger"));
    assert!(jobs[0].text.contains("DELIVERY"));
}

/// Accepts the first render and rejects every later one.
#[derive(Default)]
struct JamsAfterFirst {
    renders: AtomicU64,
    printed: AtomicU64,
}

#[async_trait]
impl PrintSurface for JamsAfterFirst {
    async fn render(&self, _payload: &ReceiptPayload) -> Result<DocumentHandle, PrintError> {
        let n = self.renders.fetch_add(1, Ordering::SeqCst);
        if n > 0 {
            return Err(PrintError::Unavailable("paper jam".into()));
        }
        Ok(DocumentHandle(n))
    }

    async fn print(&self, _document: DocumentHandle) -> Result<(), PrintError> {
        self.printed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_customer_receipt_stops_at_first_failure() {
    let surface = Arc::new(JamsAfterFirst::default());
    let printer = ReceiptPrinter::new(surface.clone(), "Casa do Acai", Duration::from_millis(500));

    let result = printer
        .print_customer(&order(OrderStatus::Completed), &context())
        .await;

    assert_eq!(result, Err(PrintError::Unavailable("paper jam".into())));
    assert_eq!(surface.renders.load(Ordering::SeqCst), 2);
    assert_eq!(surface.printed.load(Ordering::SeqCst), 1);
}
