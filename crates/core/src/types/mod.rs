//! Core types for Cartkeeper.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartTotal, LineItem};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
