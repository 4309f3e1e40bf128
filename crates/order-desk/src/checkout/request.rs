//! Inputs and outputs of the desk operations.

use super::SideEffectWarning;
use crate::cart::Cart;
use crate::dispatch::DispatchHandle;
use crate::model::{
    CourierId, Customer, DeliveryType, Money, NewOrderItem, Order, OrderId, PaymentMethod,
    SideEffect, TableId,
};

/// Identity values typed in by the operator or the customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDetails {
    pub phone: String,
    pub name: Option<String>,
    pub cpf: Option<String>,
}

impl CustomerDetails {
    pub fn new(phone: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            name: Some(name.into()),
            cpf: None,
        }
    }

    pub fn with_cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = Some(cpf.into());
        self
    }
}

/// A staffed counter sale, finalized and paid in one step.
#[derive(Debug, Clone)]
pub struct CounterSale {
    pub cart: Cart,
    /// Name and phone are mandatory on this channel.
    pub customer: CustomerDetails,
    pub delivery_type: DeliveryType,
    pub payment_method: PaymentMethod,
    pub discount: Money,
    /// Looked up in the delivery-zone table for delivery sales.
    pub delivery_distance_km: Option<f64>,
    pub motoboy_id: Option<CourierId>,
    pub notes: Option<String>,
    pub print: bool,
}

impl CounterSale {
    pub fn new(cart: Cart, customer: CustomerDetails, payment_method: PaymentMethod) -> Self {
        Self {
            cart,
            customer,
            delivery_type: DeliveryType::Counter,
            payment_method,
            discount: Money::ZERO,
            delivery_distance_km: None,
            motoboy_id: None,
            notes: None,
            print: true,
        }
    }

    /// Turn this into a delivery sale carried by `courier`.
    pub fn delivered(mut self, distance_km: f64, courier: Option<CourierId>) -> Self {
        self.delivery_type = DeliveryType::Delivery;
        self.delivery_distance_km = Some(distance_km);
        self.motoboy_id = courier;
        self
    }
}

/// A self-service sale. The cart comes from the kiosk session.
#[derive(Debug, Clone)]
pub struct KioskSale {
    pub customer: Option<CustomerDetails>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// A dine-in tab opened at a table.
#[derive(Debug, Clone)]
pub struct TabRequest {
    pub table_id: TableId,
    pub customer: Option<CustomerDetails>,
    pub items: Vec<NewOrderItem>,
    pub notes: Option<String>,
}

/// What a channel gets back from a checkout.
#[derive(Debug)]
pub struct CheckoutReport {
    /// The order as it stands after the side effects ran.
    pub order: Order,
    pub customer: Option<Customer>,
    /// Advisory for the operator; never blocks the sale.
    pub suspicious: Option<String>,
    pub warnings: Vec<SideEffectWarning>,
    /// The scheduled courier notification, if one was sent off.
    pub courier: Option<DispatchHandle>,
}

impl CheckoutReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Completed orders that still had pending steps.
    pub scanned: usize,
    pub repaired: Vec<(OrderId, SideEffect)>,
    pub failed: Vec<(OrderId, SideEffectWarning)>,
    pub couriers: Vec<DispatchHandle>,
}
