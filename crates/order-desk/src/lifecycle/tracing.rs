//! # Tracing Setup
//!
//! Structured logging for the whole desk, configured through `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per persisted order and side effect
//! RUST_LOG=debug cargo run    # plus store requests and skipped steps
//! ```
//!
//! Log lines carry structured fields (`order_id`, `order_number`, `effect`, `channel`)
//! rather than module paths, so the target is hidden. With `info` a counter sale reads:
//!
//! ```text
//! INFO counter_checkout: Customer created customer_id=customer_1
//! INFO counter_checkout: Order persisted order_id=order_1 order_number=PDV-00001 status=completed total=R$ 40,00
//! INFO counter_checkout: Loyalty points accrued points=40 balance=40
//! INFO counter_checkout: Sale recorded movement_id=cash_1 amount=R$ 40,00
//! INFO counter_checkout: Customer receipt printed
//! ```
//!
//! Side-effect failures show up at `warn` together with the operator notice they raise.

/// Install the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
