//! Per-request access to the session-stored cart.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use cartkeeper_core::Cart;

use crate::error::AppError;
use crate::models::session_keys;

/// Extractor carrying the session the cart is read from and written back to.
///
/// Handlers take this instead of touching the session directly, so the one
/// piece of state they depend on is visible in their signature.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart_session: CartSession) -> Result<String, AppError> {
///     let cart = Cart::init(cart_session.load().await?);
///     Ok(format!("{} items", cart.total.quantity))
/// }
/// ```
#[derive(Clone)]
pub struct CartSession(Session);

impl CartSession {
    /// Wrap an existing session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Read the raw cart from the session.
    ///
    /// Returns `Ok(None)` when the session holds no cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the store fails or the stored value is
    /// not a cart.
    pub async fn load(&self) -> Result<Option<Cart>, AppError> {
        Ok(self.0.get::<Cart>(session_keys::CART).await?)
    }

    /// Overwrite the session's cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session cannot be modified.
    pub async fn store(&self, cart: &Cart) -> Result<(), AppError> {
        self.0.insert(session_keys::CART, cart).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))
    }
}
