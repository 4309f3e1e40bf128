//! # Cart Builder
//!
//! Channel-local accumulation of priced lines before checkout. Nothing here is persisted;
//! the cart lives as long as the UI session that owns it.
//!
//! Unit price = `(promotional_price ?? price) + Σ price_adjustment`. Two additions merge
//! into one line only when the menu item and the customization set (compared as a sorted
//! id list, so selection order does not matter) are identical.

use crate::model::{
    Customization, CustomizationId, MenuItem, MenuItemId, Money, NewOrderItem, MAX_LINE_QUANTITY,
    MAX_UNIT_PRICE,
};
use crate::ports::{CatalogError, CatalogLookup};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("{customization} does not belong to {item}")]
    ForeignCustomization { item: String, customization: String },

    #[error("Unknown customization {0}")]
    UnknownCustomization(CustomizationId),

    #[error("No cart line at index {0}")]
    IndexOutOfRange(usize),

    #[error("{0} already has the maximum quantity")]
    QuantityLimit(String),

    #[error("Price of {0} is out of range")]
    PriceOutOfRange(String),

    #[error("Cart is empty")]
    Empty,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub customizations: Vec<Customization>,
    key: Vec<CustomizationId>,
}

impl CartItem {
    /// Line total, saturating at `Money::MAX`. Lines are capped well below that.
    pub fn total_price(&self) -> Money {
        self.unit_price.times(self.quantity).unwrap_or(Money::MAX)
    }

    /// Customization summary printed on the line, e.g. `"Cheese, No onions"`.
    pub fn notes(&self) -> Option<String> {
        if self.customizations.is_empty() {
            return None;
        }
        Some(
            self.customizations
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    pub fn to_order_item(&self) -> NewOrderItem {
        NewOrderItem {
            menu_item_id: self.menu_item_id,
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            notes: self.notes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `menu_item` with the given customizations and return the line it
    /// landed on.
    pub fn add_item(
        &mut self,
        menu_item: &MenuItem,
        customizations: &[Customization],
    ) -> Result<CartItem, CartError> {
        if !menu_item.available {
            return Err(CartError::Unavailable(menu_item.name.clone()));
        }
        if let Some(foreign) = customizations
            .iter()
            .find(|c| c.menu_item_id != menu_item.id)
        {
            return Err(CartError::ForeignCustomization {
                item: menu_item.name.clone(),
                customization: foreign.name.clone(),
            });
        }

        let mut key: Vec<CustomizationId> = customizations.iter().map(|c| c.id).collect();
        key.sort();

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item.id && line.key == key)
        {
            if line.quantity >= MAX_LINE_QUANTITY {
                return Err(CartError::QuantityLimit(line.name.clone()));
            }
            line.quantity += 1;
            return Ok(line.clone());
        }

        let unit_price = customizations
            .iter()
            .try_fold(menu_item.effective_price(), |acc, c| {
                acc.checked_add(c.price_adjustment)
            })
            .filter(|price| *price <= MAX_UNIT_PRICE)
            .ok_or_else(|| CartError::PriceOutOfRange(menu_item.name.clone()))?;
        let line = CartItem {
            menu_item_id: menu_item.id,
            name: menu_item.name.clone(),
            unit_price,
            quantity: 1,
            customizations: customizations.to_vec(),
            key,
        };
        self.items.push(line.clone());
        Ok(line)
    }

    /// Look the item and the chosen customizations up in the catalog, then add them.
    pub async fn add_from_catalog(
        &mut self,
        catalog: &dyn CatalogLookup,
        menu_item_id: MenuItemId,
        customization_ids: &[CustomizationId],
    ) -> Result<CartItem, CartError> {
        let menu_item = catalog.get_menu_item(menu_item_id).await?;
        let variations = catalog.get_variations(menu_item_id).await?;
        let chosen = customization_ids
            .iter()
            .map(|id| {
                variations
                    .iter()
                    .find(|v| v.id == *id)
                    .cloned()
                    .ok_or(CartError::UnknownCustomization(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.add_item(&menu_item, &chosen)
    }

    /// Change a line's quantity by `delta`; a result of zero or less removes the line.
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<(), CartError> {
        let line = self
            .items
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange(index))?;
        let quantity = i64::from(line.quantity) + i64::from(delta);
        if quantity <= 0 {
            self.items.remove(index);
            return Ok(());
        }
        line.quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or_else(|| CartError::QuantityLimit(line.name.clone()))?;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<CartItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::IndexOutOfRange(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.total_price()))
            .unwrap_or(Money::MAX)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_order_items(&self) -> Vec<NewOrderItem> {
        self.items.iter().map(CartItem::to_order_item).collect()
    }
}
