//! Cart items and their conversion into priced line items.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::CartError;

/// Maximum number of line items accepted in one checkout session.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum number of product images forwarded per line item.
pub const MAX_IMAGES_PER_ITEM: usize = 8;

/// Product category tag carried on each cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Handmade physical piece that must be shipped.
    Creation,
    /// Digital pattern delivered without shipping.
    Pattern,
    /// Any tag this service does not know about.
    #[serde(other)]
    Other,
}

impl ProductKind {
    pub fn is_physical(&self) -> bool {
        matches!(self, ProductKind::Creation)
    }
}

/// A cart entry as submitted by the storefront.
///
/// Extra catalog fields (description, category, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Unit price in major currency units.
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProductKind>,
}

impl CartItem {
    /// Unit price in minor currency units, rounded half away from zero.
    ///
    /// Returns `None` when the amount does not fit in an `i64`.
    pub fn minor_units(&self) -> Option<i64> {
        self.price
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    pub fn is_physical(&self) -> bool {
        self.kind.map(|k| k.is_physical()).unwrap_or(false)
    }
}

/// One priced, quantified entry of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub images: Vec<String>,
    /// Unit amount in minor currency units.
    pub unit_amount: i64,
    pub quantity: u64,
}

/// A validated, non-empty cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
    requires_shipping: bool,
}

impl Cart {
    /// Validates the submitted items and prices them.
    ///
    /// # Errors
    ///
    /// Returns the first `CartError` found, in item order.
    pub fn new(items: Vec<CartItem>) -> Result<Self, CartError> {
        if items.is_empty() {
            return Err(CartError::Empty);
        }
        if items.len() > MAX_CART_ITEMS {
            return Err(CartError::TooManyItems {
                count: items.len(),
                max: MAX_CART_ITEMS,
            });
        }

        let requires_shipping = items.iter().any(CartItem::is_physical);

        let lines = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| price_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lines,
            requires_shipping,
        })
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.lines
    }

    /// True iff at least one item is a physical creation.
    pub fn requires_shipping(&self) -> bool {
        self.requires_shipping
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn price_item(index: usize, item: CartItem) -> Result<LineItem, CartError> {
    let name = item.name.trim();
    if name.is_empty() {
        return Err(CartError::MissingName { index });
    }

    let quantity = u64::try_from(item.quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or(CartError::InvalidQuantity {
            index,
            quantity: item.quantity,
        })?;

    if item.price.is_sign_negative() && !item.price.is_zero() {
        return Err(CartError::NegativePrice { index });
    }

    let unit_amount = item
        .minor_units()
        .ok_or(CartError::AmountOutOfRange { index })?;

    let images = item
        .image_urls
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .take(MAX_IMAGES_PER_ITEM)
        .collect();

    Ok(LineItem {
        name: name.to_string(),
        images,
        unit_amount,
        quantity,
    })
}
