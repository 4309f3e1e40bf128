//! # Kiosk Session
//!
//! A self-service kiosk holds one cart and one inactivity countdown. Each interaction
//! restarts the countdown; when it runs out the cart is cleared and a
//! [`Notice::KioskReset`] is published.
//!
//! Starting checkout takes the cart and cancels the countdown under the same lock the
//! expiry path checks, so once an order has begun persisting a reset can no longer fire.
//! The session never touches persisted orders: a kiosk order already in `preparing`
//! stays there whatever happens to the session afterwards.

use crate::cart::{Cart, CartError};
use crate::notices::{Notice, Notifier};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KioskError {
    #[error("A checkout is in progress")]
    CheckoutInProgress,

    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Default)]
struct KioskState {
    cart: Cart,
    /// Bumped on every interaction; a countdown only fires for its own generation.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    checking_out: bool,
}

pub struct KioskSession {
    shared: Arc<Mutex<KioskState>>,
    idle_timeout: Duration,
    notifier: Notifier,
}

fn lock(state: &Mutex<KioskState>) -> MutexGuard<'_, KioskState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl KioskSession {
    pub fn new(idle_timeout: Duration, notifier: Notifier) -> Self {
        Self {
            shared: Arc::new(Mutex::new(KioskState::default())),
            idle_timeout,
            notifier,
        }
    }

    /// Apply a user interaction to the cart and restart the countdown.
    pub fn interact<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> Result<R, KioskError> {
        let mut state = lock(&self.shared);
        if state.checking_out {
            return Err(KioskError::CheckoutInProgress);
        }
        let result = f(&mut state.cart);
        self.restart_countdown(&mut state);
        Ok(result)
    }

    /// An interaction that does not change the cart (scrolling, browsing categories).
    pub fn touch(&self) -> Result<(), KioskError> {
        self.interact(|_| ())
    }

    pub fn cart(&self) -> Cart {
        lock(&self.shared).cart.clone()
    }

    /// Take the cart for checkout and stop the countdown.
    pub fn begin_checkout(&self) -> Result<Cart, KioskError> {
        let mut state = lock(&self.shared);
        if state.checking_out {
            return Err(KioskError::CheckoutInProgress);
        }
        if state.cart.is_empty() {
            return Err(CartError::Empty.into());
        }
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.checking_out = true;
        debug!(lines = state.cart.len(), "Kiosk checkout started");
        Ok(std::mem::take(&mut state.cart))
    }

    /// The order was placed; the kiosk is ready for the next customer.
    pub fn finish_checkout(&self) {
        let mut state = lock(&self.shared);
        state.checking_out = false;
        state.cart.clear();
    }

    /// Checkout failed before an order was written: give the cart back.
    pub fn abort_checkout(&self, cart: Cart) {
        let mut state = lock(&self.shared);
        state.checking_out = false;
        state.cart = cart;
        self.restart_countdown(&mut state);
    }

    fn restart_countdown(&self, state: &mut KioskState) {
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let generation = state.generation;
        let shared = Arc::clone(&self.shared);
        let notifier = self.notifier.clone();
        let idle = self.idle_timeout;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle).await;
            let expired = {
                let mut state = lock(&shared);
                if state.generation == generation && !state.checking_out {
                    state.cart.clear();
                    state.timer = None;
                    true
                } else {
                    false
                }
            };
            if expired {
                info!("Kiosk idle, cart cleared");
                notifier.publish(Notice::KioskReset);
            }
        }));
    }
}

impl Drop for KioskSession {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.shared).timer.take() {
            timer.abort();
        }
    }
}
