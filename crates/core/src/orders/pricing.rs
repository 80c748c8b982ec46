//! Item pricing for order placement.
//!
//! Unit prices are resolved once, when the order is placed, and stored with
//! the order. The catalog lives in site settings under `price.<product>`
//! keys holding integer minor units.

use std::collections::HashMap;

use coop_shared::Money;

use crate::orders::error::OrderError;
use crate::orders::types::{OrderItemRequest, PricedItem, PricedOrder};

/// Site-setting key prefix for catalog prices.
pub const CATALOG_PRICE_PREFIX: &str = "price.";

const DEFAULT_UNIT: &str = "unit";

/// Current catalog prices by product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    prices: HashMap<String, Money>,
}

impl Catalog {
    /// Builds a catalog from `(key, value)` setting pairs.
    ///
    /// Keys without the `price.` prefix and values that are not positive
    /// integers are ignored.
    pub fn from_settings<'a, I>(settings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let prices = settings
            .into_iter()
            .filter_map(|(key, value)| {
                let product = key.strip_prefix(CATALOG_PRICE_PREFIX)?;
                let price = value.trim().parse::<i64>().ok().filter(|p| *p > 0)?;
                Some((product.to_string(), Money::from_minor(price)))
            })
            .collect();
        Self { prices }
    }

    /// Returns the setting key that holds `product`'s price.
    #[must_use]
    pub fn key_for(product: &str) -> String {
        format!("{CATALOG_PRICE_PREFIX}{product}")
    }

    /// Returns the catalog price for `product`, if listed.
    #[must_use]
    pub fn price_for(&self, product: &str) -> Option<Money> {
        self.prices.get(product).copied()
    }
}

/// Checks the customer contact fields required on every order.
pub fn validate_contact(customer_name: &str, customer_phone: &str) -> Result<(), OrderError> {
    if customer_name.trim().is_empty() {
        return Err(OrderError::MissingCustomerName);
    }
    if customer_phone.trim().is_empty() {
        return Err(OrderError::MissingCustomerPhone);
    }
    Ok(())
}

/// Prices every requested item and totals the order.
///
/// A catalog price wins over the caller's price; the caller's price is only
/// used for products the catalog does not list, and must be positive.
///
/// # Errors
///
/// Returns a validation `OrderError` for an empty order, a blank product,
/// a quantity below one or a product with no usable price.
pub fn price_order(items: &[OrderItemRequest], catalog: &Catalog) -> Result<PricedOrder, OrderError> {
    if items.is_empty() {
        return Err(OrderError::NoItems);
    }

    let mut priced = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let product = item.product.trim();
        if product.is_empty() {
            return Err(OrderError::MissingProduct(index));
        }
        if item.quantity < 1 {
            return Err(OrderError::InvalidQuantity {
                product: product.to_string(),
                quantity: item.quantity,
            });
        }

        let unit_price = catalog
            .price_for(product)
            .or(item.unit_price.filter(|p| p.is_positive()))
            .ok_or_else(|| OrderError::MissingPrice(product.to_string()))?;
        let line_total = unit_price
            .checked_mul(i64::from(item.quantity))
            .map_err(|_| OrderError::Overflow)?;

        priced.push(PricedItem {
            product: product.to_string(),
            quantity: item.quantity,
            unit: item
                .unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_UNIT)
                .to_string(),
            unit_price,
            line_total,
        });
    }

    let total_amount = Money::checked_sum(priced.iter().map(|item| item.line_total))
        .map_err(|_| OrderError::Overflow)?;

    Ok(PricedOrder {
        items: priced,
        total_amount,
    })
}
