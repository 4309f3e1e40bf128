use super::LedgerError;
use crate::clients::{CustomerClient, LoyaltyTransactionClient};
use crate::customer_actor::{LoyaltyApplied, LoyaltyEntry};
use crate::model::{
    Customer, CustomerId, LoyaltyKind, LoyaltyTransaction, Order, OrderId, OrderStatus, PointsRate,
};
use tracing::{debug, info, instrument, warn};

/// Result of comparing a customer's stored balance with its ledger rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyAudit {
    pub customer_id: CustomerId,
    pub balance: i64,
    pub ledger_sum: i64,
    pub consistent: bool,
}

/// Accrues and redeems points.
///
/// The row append and the balance change happen inside one customer-actor action, so
/// they are serialized with every other write to that customer.
#[derive(Clone)]
pub struct LoyaltyLedger {
    customers: CustomerClient,
    transactions: LoyaltyTransactionClient,
    enabled: bool,
    points_per_unit: PointsRate,
}

impl LoyaltyLedger {
    pub fn new(
        customers: CustomerClient,
        transactions: LoyaltyTransactionClient,
        enabled: bool,
        points_per_unit: PointsRate,
    ) -> Self {
        Self {
            customers,
            transactions,
            enabled,
            points_per_unit,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Credit `floor(total × points_per_unit)` points for a completed order.
    ///
    /// Returns `None` when nothing is owed: loyalty disabled, no tax id on file, or a
    /// total too small to earn a point. Calling it again for the same order returns the
    /// existing transaction without touching the balance.
    #[instrument(skip(self, order, customer), fields(order_id = %order.id, customer_id = %customer.id))]
    pub async fn accrue(
        &self,
        order: &Order,
        customer: &Customer,
    ) -> Result<Option<LoyaltyTransaction>, LedgerError> {
        if !self.enabled {
            debug!("Loyalty disabled");
            return Ok(None);
        }
        if order.status != OrderStatus::Completed {
            return Err(LedgerError::NotCompleted(order.order_number.clone()));
        }
        if order.customer_id != Some(customer.id) {
            return Err(LedgerError::CustomerMismatch(order.order_number.clone()));
        }
        if !customer.has_tax_id() {
            debug!("Customer has no tax id, no points");
            return Ok(None);
        }
        let points = order.total.loyalty_points(self.points_per_unit);
        if points <= 0 {
            return Ok(None);
        }

        let entry = LoyaltyEntry {
            order_id: order.id,
            kind: LoyaltyKind::Earn,
            points,
            description: format!("Points earned on order {}", order.order_number),
        };
        let applied = self.customers.apply_loyalty(customer.id, entry).await?;
        if applied.newly_applied {
            info!(points, balance = applied.balance, "Loyalty points accrued");
        } else {
            debug!("Accrual already applied");
        }
        Ok(Some(applied.transaction))
    }

    /// Spend points against an order. Fails with `InsufficientPoints` rather than let the
    /// balance go negative.
    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
        points: i64,
    ) -> Result<LoyaltyApplied, LedgerError> {
        let entry = LoyaltyEntry {
            order_id,
            kind: LoyaltyKind::Redeem,
            points,
            description: format!("Points redeemed on {order_id}"),
        };
        let applied = self.customers.apply_loyalty(customer_id, entry).await?;
        info!(balance = applied.balance, "Loyalty points redeemed");
        Ok(applied)
    }

    /// Check that the balance equals the signed sum of the customer's transactions.
    pub async fn audit(&self, customer_id: CustomerId) -> Result<LoyaltyAudit, LedgerError> {
        let customer = self.customers.fetch(customer_id).await?;
        let ledger_sum: i64 = self
            .transactions
            .for_customer(customer_id)
            .await?
            .iter()
            .map(LoyaltyTransaction::signed_points)
            .sum();
        let consistent = ledger_sum == customer.loyalty_points;
        if !consistent {
            warn!(
                %customer_id,
                balance = customer.loyalty_points,
                ledger_sum,
                "Loyalty balance drifted from ledger"
            );
        }
        Ok(LoyaltyAudit {
            customer_id,
            balance: customer.loyalty_points,
            ledger_sum,
            consistent,
        })
    }
}
