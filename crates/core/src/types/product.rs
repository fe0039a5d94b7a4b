//! Product records as seen by the cart.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product that can be placed in a cart.
///
/// The cart keeps a snapshot of this record in each line, so a later price
/// change in the catalogue does not rewrite lines already in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Previous unit price, shown struck through when present.
    pub old_price: Option<Price>,
    /// Units in stock. The cart never holds more than this.
    pub quantity: u32,
    /// Image path relative to the static asset root.
    pub image: Option<String>,
}

impl Product {
    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}
