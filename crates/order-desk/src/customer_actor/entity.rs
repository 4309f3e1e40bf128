//! [`ActorEntity`] implementation for [`Customer`].
//!
//! The context is the loyalty-ledger client: applying points appends the ledger row from
//! inside the customer actor, so the append and the balance change are serialized with
//! every other write to the same customer.

use super::actions::{CustomerAction, CustomerActionResult, LoyaltyApplied, LoyaltyEntry};
use super::error::CustomerError;
use crate::clients::LoyaltyTransactionClient;
use crate::loyalty_actor::LoyaltyError;
use crate::model::{
    Customer, CustomerCreate, CustomerId, CustomerUpdate, LoyaltyTransaction,
    LoyaltyTransactionCreate,
};
use async_trait::async_trait;
use record_store::ActorEntity;
use tracing::debug;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl ActorEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Context = LoyaltyTransactionClient;
    type Error = CustomerError;

    fn from_create_params(id: CustomerId, params: CustomerCreate) -> Result<Self, Self::Error> {
        let phone = params.phone.trim();
        if phone.is_empty() {
            return Err(CustomerError::EmptyPhone);
        }
        let mut customer = Customer::new(id, phone, params.name.trim());
        customer.cpf = non_empty(params.cpf);
        Ok(customer)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.phone.clone())
    }

    /// Last write wins for name and tax id. Empty values are ignored.
    async fn on_update(
        &mut self,
        update: CustomerUpdate,
        _ctx: &LoyaltyTransactionClient,
    ) -> Result<(), Self::Error> {
        if let Some(name) = non_empty(update.name) {
            self.name = name;
        }
        if let Some(cpf) = non_empty(update.cpf) {
            self.cpf = Some(cpf);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CustomerAction,
        ctx: &LoyaltyTransactionClient,
    ) -> Result<CustomerActionResult, Self::Error> {
        match action {
            CustomerAction::ApplyLoyalty(entry) => self
                .apply_loyalty(entry, ctx)
                .await
                .map(CustomerActionResult::ApplyLoyalty),
            CustomerAction::MarkSuspicious { reason } => {
                self.is_suspicious = true;
                self.suspicious_reason = Some(reason);
                Ok(CustomerActionResult::MarkSuspicious(self.clone()))
            }
            CustomerAction::ClearSuspicious => {
                self.is_suspicious = false;
                self.suspicious_reason = None;
                Ok(CustomerActionResult::ClearSuspicious(self.clone()))
            }
        }
    }
}

impl Customer {
    async fn apply_loyalty(
        &mut self,
        entry: LoyaltyEntry,
        ledger: &LoyaltyTransactionClient,
    ) -> Result<LoyaltyApplied, CustomerError> {
        if entry.points <= 0 {
            return Err(LoyaltyError::InvalidPoints(entry.points).into());
        }
        let key = LoyaltyTransaction::key_for(entry.kind, entry.order_id);

        let existing = ledger.find_for_order(entry.kind, entry.order_id).await?;
        if let Some(tx) = &existing {
            if tx.customer_id != self.id {
                return Err(CustomerError::ForeignTransaction(key));
            }
            if self.applied_transactions.contains(&tx.id) {
                debug!(%key, "Loyalty transaction already applied");
                return Ok(LoyaltyApplied {
                    transaction: tx.clone(),
                    balance: self.loyalty_points,
                    newly_applied: false,
                });
            }
        }

        // A row left behind by an interrupted attempt keeps its original points.
        let delta = existing
            .as_ref()
            .map_or(entry.kind.signed(entry.points), LoyaltyTransaction::signed_points);
        if self.loyalty_points + delta < 0 {
            return Err(CustomerError::InsufficientPoints {
                requested: -delta,
                available: self.loyalty_points,
            });
        }

        let transaction = match existing {
            Some(tx) => tx,
            None => {
                let id = ledger
                    .append(LoyaltyTransactionCreate {
                        customer_id: self.id,
                        order_id: entry.order_id,
                        kind: entry.kind,
                        points: entry.points,
                        description: entry.description,
                    })
                    .await?;
                ledger
                    .fetch(id)
                    .await?
            }
        };

        self.loyalty_points += delta;
        self.applied_transactions.insert(transaction.id);
        Ok(LoyaltyApplied {
            transaction,
            balance: self.loyalty_points,
            newly_applied: true,
        })
    }
}
