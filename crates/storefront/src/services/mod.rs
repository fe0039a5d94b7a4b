//! Services the storefront handlers depend on.
//!
//! # Services
//!
//! - `products` - Product lookup for the cart (`ProductLoader` and its implementations)

pub mod products;

pub use products::{PgProductLoader, ProductLoader, StaticProductLoader};
