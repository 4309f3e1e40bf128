//! Catalog entries as seen by the cart. The catalog itself is managed elsewhere and only
//! read through [`CatalogLookup`](crate::ports::CatalogLookup).

use super::Money;
use serde::{Deserialize, Serialize};

record_id!(
    /// Identifier of a menu item in the external catalog.
    MenuItemId,
    "menu_item"
);

record_id!(
    /// Identifier of a customization (variation) offered for a menu item.
    CustomizationId,
    "customization"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Money,
    pub promotional_price: Option<Money>,
    pub category: String,
    pub available: bool,
}

impl MenuItem {
    pub fn new(id: u32, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: MenuItemId(id),
            name: name.into(),
            price,
            promotional_price: None,
            category: String::new(),
            available: true,
        }
    }

    pub fn with_promotion(mut self, price: Money) -> Self {
        self.promotional_price = Some(price);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// The price charged right now: the promotion when one is running.
    pub fn effective_price(&self) -> Money {
        self.promotional_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub id: CustomizationId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    /// Added to (or, when negative, taken off) the unit price.
    pub price_adjustment: Money,
}

impl Customization {
    pub fn new(
        id: u32,
        menu_item_id: MenuItemId,
        name: impl Into<String>,
        price_adjustment: Money,
    ) -> Self {
        Self {
            id: CustomizationId(id),
            menu_item_id,
            name: name.into(),
            price_adjustment,
        }
    }
}
