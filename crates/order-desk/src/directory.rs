//! # Customer Directory
//!
//! Resolves a phone number to a customer, creating or correcting the record on the way.
//! Phones are opaque strings: they are trimmed and matched exactly, nothing more.
//!
//! Duplicate customers are prevented by the store's unique phone index, not by the
//! lookup debounce. When two checkouts create the same new phone at once, the one that
//! loses the race gets `DuplicatePhone` back and re-reads the winner.

use crate::clients::CustomerClient;
use crate::customer_actor::CustomerError;
use crate::model::{Customer, CustomerCreate, CustomerUpdate};
use crate::notices::{Notice, Notifier};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Pre-checkout lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct Screening {
    pub customer: Option<Customer>,
    /// Advisory only; the sale may continue.
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct CustomerDirectory {
    customers: CustomerClient,
    notifier: Notifier,
}

fn supplied(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CustomerDirectory {
    pub fn new(customers: CustomerClient, notifier: Notifier) -> Self {
        Self {
            customers,
            notifier,
        }
    }

    /// Find or create the customer behind `phone`.
    ///
    /// A blank phone is an anonymous sale and resolves to `None`. Supplied name and tax
    /// id values overwrite the stored ones when they differ. A suspicious customer is
    /// returned normally and also published as a notice.
    #[instrument(skip(self, name, cpf))]
    pub async fn resolve(
        &self,
        phone: &str,
        name: Option<&str>,
        cpf: Option<&str>,
    ) -> Result<Option<Customer>, CustomerError> {
        let phone = phone.trim();
        if phone.is_empty() {
            debug!("No phone supplied, anonymous sale");
            return Ok(None);
        }
        let name = supplied(name);
        let cpf = supplied(cpf);

        let customer = match self.customers.find_by_phone(phone).await? {
            Some(existing) => self.merge(existing, name, cpf).await?,
            None => self.create(phone, name, cpf).await?,
        };

        if let Some(reason) = customer.warning() {
            self.notifier.publish(Notice::SuspiciousCustomer {
                phone: customer.phone.clone(),
                reason,
            });
        }
        Ok(Some(customer))
    }

    /// Read-only lookup a channel runs while the phone is being typed.
    pub async fn screen(&self, phone: &str) -> Result<Screening, CustomerError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Ok(Screening {
                customer: None,
                warning: None,
            });
        }
        let customer = self.customers.find_by_phone(phone).await?;
        let warning = customer.as_ref().and_then(Customer::warning);
        Ok(Screening { customer, warning })
    }

    async fn create(
        &self,
        phone: &str,
        name: Option<String>,
        cpf: Option<String>,
    ) -> Result<Customer, CustomerError> {
        let params = CustomerCreate {
            phone: phone.to_string(),
            name: name.clone().unwrap_or_default(),
            cpf: cpf.clone(),
        };
        match self.customers.create_customer(params).await {
            Ok(id) => {
                info!(customer_id = %id, "Customer created");
                self.customers.fetch(id).await
            }
            Err(CustomerError::DuplicatePhone(_)) => {
                debug!("Lost customer creation race, re-reading");
                let existing = self
                    .customers
                    .find_by_phone(phone)
                    .await?
                    .ok_or_else(|| CustomerError::NotFound(phone.to_string()))?;
                self.merge(existing, name, cpf).await
            }
            Err(e) => Err(e),
        }
    }

    async fn merge(
        &self,
        existing: Customer,
        name: Option<String>,
        cpf: Option<String>,
    ) -> Result<Customer, CustomerError> {
        let update = CustomerUpdate {
            name: name.filter(|n| *n != existing.name),
            cpf: cpf.filter(|c| existing.cpf.as_deref() != Some(c.as_str())),
        };
        if update.is_empty() {
            return Ok(existing);
        }
        debug!(customer_id = %existing.id, "Applying supplied corrections");
        self.customers.update_customer(existing.id, update).await
    }
}

/// Settles phone input: a value is emitted only after `delay` without further input.
///
/// Purely a read-volume optimisation for the lookup screen.
pub struct PhoneDebouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    sender: Arc<watch::Sender<Option<String>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl PhoneDebouncer {
    pub fn new(delay: Duration) -> (Self, watch::Receiver<Option<String>>) {
        let (sender, receiver) = watch::channel(None);
        let debouncer = Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            sender: Arc::new(sender),
            pending: Mutex::new(None),
        };
        (debouncer, receiver)
    }

    /// Record the current contents of the phone field.
    pub fn input(&self, phone: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let sender = Arc::clone(&self.sender);
        let delay = self.delay;
        let phone = phone.trim().to_string();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                sender.send_replace(Some(phone));
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }
}

impl Drop for PhoneDebouncer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
