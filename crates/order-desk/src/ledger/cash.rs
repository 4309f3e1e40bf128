use super::LedgerError;
use crate::cash_actor::CashError;
use crate::clients::CashMovementClient;
use crate::model::{
    CashMovement, CashMovementCreate, CashMovementId, Money, MovementKind, Order, OrderStatus,
    PaymentMethod, SALE_CATEGORY,
};
use record_store::ActorClient;
use tracing::{debug, info, instrument};

/// Records drawer movements. One `income` row per completed sale, keyed by order id.
#[derive(Clone)]
pub struct CashLedger {
    movements: CashMovementClient,
}

impl CashLedger {
    pub fn new(movements: CashMovementClient) -> Self {
        Self { movements }
    }

    /// Record the sale income for a completed order, or return the row already recorded.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn record(&self, order: &Order) -> Result<CashMovement, LedgerError> {
        if order.status != OrderStatus::Completed {
            return Err(LedgerError::NotCompleted(order.order_number.clone()));
        }
        let payment_method = order
            .payment_method
            .ok_or_else(|| LedgerError::MissingPayment(order.order_number.clone()))?;

        if let Some(existing) = self.movements.find_sale(order.id).await? {
            debug!(movement_id = %existing.id, "Sale already recorded");
            return Ok(existing);
        }

        let params = CashMovementCreate {
            kind: MovementKind::Income,
            category: SALE_CATEGORY.to_string(),
            amount: order.total,
            payment_method,
            description: format!("Sale {}", order.order_number),
            order_id: Some(order.id),
        };
        match self.movements.record(params).await {
            Ok(id) => {
                info!(movement_id = %id, amount = %order.total, "Sale recorded");
                self.fetch(id).await
            }
            Err(CashError::Duplicate(key)) => {
                debug!(%key, "Sale recorded concurrently");
                self.movements
                    .find_sale(order.id)
                    .await?
                    .ok_or_else(|| CashError::NotFound(key).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record money leaving the drawer (supplies, change runs, ...).
    #[instrument(skip(self, description))]
    pub async fn record_expense(
        &self,
        category: &str,
        amount: Money,
        payment_method: PaymentMethod,
        description: &str,
    ) -> Result<CashMovement, LedgerError> {
        let params = CashMovementCreate {
            kind: MovementKind::Expense,
            category: category.to_string(),
            amount,
            payment_method,
            description: description.to_string(),
            order_id: None,
        };
        let id = self.movements.record(params).await?;
        info!(movement_id = %id, %amount, "Expense recorded");
        self.fetch(id).await
    }

    async fn fetch(&self, id: CashMovementId) -> Result<CashMovement, LedgerError> {
        Ok(self
            .movements
            .get(id)
            .await?
            .ok_or_else(|| CashError::NotFound(id.to_string()))?)
    }
}
