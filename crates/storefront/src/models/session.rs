//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "cart";
}
