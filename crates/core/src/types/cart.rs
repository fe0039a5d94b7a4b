//! Session-stored shopping cart.
//!
//! A [`Cart`] is a plain value: every operation consumes the cart and returns
//! the updated one. The storefront serializes it into the session between
//! requests and rebuilds it with [`Cart::init`] on the next one.
//!
//! # Invariants
//!
//! - `total.quantity` is the sum of every line's quantity
//! - `total.price` is the sum of every line's price
//! - no line has a quantity of zero
//! - a line never holds more units than its product had in stock when added
//! - lines keep insertion order

use serde::{Deserialize, Serialize};

use super::{CurrencyCode, Price, Product, ProductId};

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Snapshot of the product taken when the line was created.
    pub product: Product,
    pub quantity: u32,
    /// Line total: unit price times quantity.
    pub price: Price,
}

impl LineItem {
    /// The line-item identifier, which is the product's ID.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Aggregate totals across all lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotal {
    pub quantity: u32,
    pub price: Price,
}

impl Default for CartTotal {
    fn default() -> Self {
        Self {
            quantity: 0,
            price: Price::zero(CurrencyCode::default()),
        }
    }
}

/// The aggregate of line items for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub total: CartTotal,
}

impl Cart {
    /// Rebuild a cart from session state.
    ///
    /// An absent value yields an empty cart. Totals are recomputed from the
    /// lines so a stale or hand-edited total cannot survive a round trip.
    #[must_use]
    pub fn init(previous: Option<Self>) -> Self {
        previous.map_or_else(Self::default, Self::recalculate)
    }

    /// Add one unit of `product`.
    ///
    /// Creates the line if needed. When the line already holds every unit in
    /// stock, or the product is out of stock, the cart is returned unchanged.
    #[must_use]
    pub fn add_one(mut self, product: &Product) -> Self {
        if let Some(line) = self.line_mut(product.id) {
            if line.quantity >= product.quantity {
                return self;
            }
            line.quantity += 1;
            line.price = line.product.price.times(line.quantity);
        } else {
            if !product.in_stock() {
                return self;
            }
            self.items.push(LineItem {
                product: product.clone(),
                quantity: 1,
                price: product.price,
            });
        }

        self.recalculate()
    }

    /// Remove one unit from the line for `id`, dropping the line at zero.
    ///
    /// Unknown IDs leave the cart unchanged.
    #[must_use]
    pub fn remove_one(mut self, id: ProductId) -> Self {
        let Some(line) = self.line_mut(id) else {
            return self;
        };
        line.quantity = line.quantity.saturating_sub(1);
        line.price = line.product.price.times(line.quantity);

        self.items.retain(|line| line.quantity > 0);
        self.recalculate()
    }

    /// Remove the line for `id` entirely.
    ///
    /// Unknown IDs leave the cart unchanged.
    #[must_use]
    pub fn delete(mut self, id: ProductId) -> Self {
        self.items.retain(|line| line.id() != id);
        self.recalculate()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|line| line.id() == id)
    }

    fn recalculate(mut self) -> Self {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |line| line.price.currency_code);

        self.total = self.items.iter().fold(
            CartTotal {
                quantity: 0,
                price: Price::zero(currency),
            },
            |total, line| CartTotal {
                quantity: total.quantity + line.quantity,
                price: total.price + line.price,
            },
        );
        self
    }
}
