//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (product store reachable)
//!
//! # Cart
//! GET    /cart                 - Cart page
//! POST   /cart/add/{id}        - Add one unit of a product, redirect to /cart
//! POST   /cart/remove/{id}     - Remove one unit of a line item, redirect to /cart
//! DELETE /cart/{id}            - Delete a line item, redirect to /cart
//! POST   /cart/delete/{id}     - Same as DELETE, for HTML forms
//! ```

pub mod cart;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::view))
        .route("/add/{id}", post(cart::add_one))
        .route("/remove/{id}", post(cart::remove_one))
        .route("/delete/{id}", post(cart::delete))
        .route("/{id}", axum::routing::delete(cart::delete))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/cart", cart_routes())
}
