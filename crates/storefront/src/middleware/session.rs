//! Session middleware configuration.
//!
//! Production sessions live in `PostgreSQL` (`tower-sessions-sqlx-store`);
//! tests hand the same layer an in-memory store.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ck_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - Session store (`PostgresStore` in production)
/// * `config` - Storefront configuration (for the cookie `Secure` flag)
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &StorefrontConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
