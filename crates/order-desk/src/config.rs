//! Desk configuration.
//!
//! Built from environment variables with defaults for anything missing. A value that
//! fails to parse falls back to its default rather than stopping the desk.
//!
//! | Variable | Default |
//! |---|---|
//! | `DESK_RESTAURANT_NAME` | `Restaurant` |
//! | `DESK_LOYALTY_ENABLED` | `true` |
//! | `DESK_POINTS_PER_UNIT` | `1.0` (up to three decimals) |
//! | `DESK_SERVICE_FEE_BP` | `1000` (10%) |
//! | `DESK_PRINT_STAGGER_MS` | `500` |
//! | `DESK_COURIER_DELAY_MS` | `1500` |
//! | `DESK_KIOSK_IDLE_SECS` | `120` |
//! | `DESK_PHONE_DEBOUNCE_MS` | `1000` |
//! | `DESK_SESSION_TTL_SECS` | `28800` (8h) |
//! | `DESK_STORE_BUFFER` | `32` |

use crate::model::PointsRate;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    /// Display name printed on customer receipts.
    pub restaurant_name: String,
    pub loyalty_enabled: bool,
    /// Points per currency unit of order total, exact to a thousandth.
    pub points_per_unit: PointsRate,
    /// Dine-in service fee in basis points.
    pub service_fee_bp: u32,
    /// Pause between the two customer receipt copies.
    pub print_stagger: Duration,
    /// Wait before notifying a courier, so the order is committed first.
    pub courier_delay: Duration,
    pub kiosk_idle_timeout: Duration,
    pub phone_debounce: Duration,
    pub session_ttl: Duration,
    /// Mailbox capacity of each record actor.
    pub store_buffer: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            restaurant_name: "Restaurant".to_string(),
            loyalty_enabled: true,
            points_per_unit: PointsRate::ONE,
            service_fee_bp: 1000,
            print_stagger: Duration::from_millis(500),
            courier_delay: Duration::from_millis(1500),
            kiosk_idle_timeout: Duration::from_secs(120),
            phone_debounce: Duration::from_millis(1000),
            session_ttl: Duration::from_secs(8 * 60 * 60),
            store_buffer: 32,
        }
    }
}

impl DeskConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            restaurant_name: lookup("DESK_RESTAURANT_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.restaurant_name),

            loyalty_enabled: lookup("DESK_LOYALTY_ENABLED")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.loyalty_enabled),

            points_per_unit: parse(&lookup, "DESK_POINTS_PER_UNIT")
                .unwrap_or(defaults.points_per_unit),

            service_fee_bp: parse(&lookup, "DESK_SERVICE_FEE_BP").unwrap_or(defaults.service_fee_bp),

            print_stagger: parsed("DESK_PRINT_STAGGER_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.print_stagger),

            courier_delay: parsed("DESK_COURIER_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.courier_delay),

            kiosk_idle_timeout: parsed("DESK_KIOSK_IDLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.kiosk_idle_timeout),

            phone_debounce: parsed("DESK_PHONE_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.phone_debounce),

            session_ttl: parsed("DESK_SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),

            store_buffer: parse(&lookup, "DESK_STORE_BUFFER")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.store_buffer),
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
