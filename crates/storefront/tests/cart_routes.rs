//! End-to-end tests for the cart routes.
//!
//! Requests go through the real router and session layer, backed by an
//! in-memory session store and a static product catalogue. The session cookie
//! from one response is carried into the next request like a browser would.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use cartkeeper_core::{CurrencyCode, Price, Product, ProductId};
use cartkeeper_storefront::config::{SentryConfig, StorefrontConfig};
use cartkeeper_storefront::db::RepositoryError;
use cartkeeper_storefront::middleware::create_session_layer;
use cartkeeper_storefront::routes;
use cartkeeper_storefront::services::{ProductLoader, StaticProductLoader};
use cartkeeper_storefront::state::AppState;

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/cartkeeper_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        product_cache_ttl: Duration::from_secs(300),
        sentry: SentryConfig::default(),
    }
}

fn product(id: i32, cents: u32, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Price::from_cents(cents, CurrencyCode::USD),
        old_price: None,
        quantity: stock,
        image: None,
    }
}

fn app_with(loader: Arc<dyn ProductLoader>) -> Router {
    let config = test_config();
    let session_layer = create_session_layer(MemoryStore::default(), &config);
    let state = AppState::new(config, loader);

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state)
}

fn app() -> Router {
    app_with(Arc::new(StaticProductLoader::new([
        product(42, 1250, 5),
        product(7, 300, 1),
    ])))
}

/// Loader whose backing store is down.
struct BrokenLoader;

#[async_trait]
impl ProductLoader for BrokenLoader {
    async fn load(&self, _id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(RepositoryError::DataCorruption("store offline".to_string()))
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::DataCorruption("store offline".to_string()))
    }
}

async fn send(app: &Router, method: Method, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// The `name=value` part of the session `Set-Cookie` header, if any.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn cart_page(app: &Router, cookie: Option<&str>) -> String {
    let response = send(app, Method::GET, "/cart", cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_text(response).await
}

/// Add a product and return the session cookie.
async fn start_cart(app: &Router, uri: &str) -> String {
    let response = send(app, Method::POST, uri, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response).unwrap()
}

#[tokio::test]
async fn view_without_session_cart_renders_empty_cart() {
    let app = app();
    let response = send(&app, Method::GET, "/cart", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Your cart is empty"));
    assert!(html.contains("cart-count\">0 items"));
}

#[tokio::test]
async fn add_one_stores_product_and_redirects() {
    let app = app();
    let response = send(&app, Method::POST, "/cart/add/42", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
    let cookie = session_cookie(&response).unwrap();

    let html = cart_page(&app, Some(&cookie)).await;
    assert!(html.contains("data-product-id=\"42\""));
    assert!(html.contains("Product 42"));
    assert!(html.contains("cart-count\">1 items"));
    assert!(html.contains("$12.50"));
}

#[tokio::test]
async fn add_one_twice_increments_line() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;
    send(&app, Method::POST, "/cart/add/42", Some(&cookie)).await;

    let html = cart_page(&app, Some(&cookie)).await;
    assert!(html.contains("cart-count\">2 items"));
    assert!(html.contains("Subtotal: $25.00"));
}

#[tokio::test]
async fn add_one_unknown_product_is_not_found() {
    let app = app();
    let response = send(&app, Method::POST, "/cart/add/999", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn add_one_with_unknown_product_keeps_existing_cart() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;
    let before = cart_page(&app, Some(&cookie)).await;

    let response = send(&app, Method::POST, "/cart/add/999", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(cart_page(&app, Some(&cookie)).await, before);
}

#[tokio::test]
async fn add_one_respects_stock() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/7").await;
    let response = send(&app, Method::POST, "/cart/add/7", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = cart_page(&app, Some(&cookie)).await;
    assert!(html.contains("cart-count\">1 items"));
}

#[tokio::test]
async fn add_one_loader_failure_is_server_error() {
    let app = app_with(Arc::new(BrokenLoader));
    let response = send(&app, Method::POST, "/cart/add/42", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(session_cookie(&response).is_none());
    assert_eq!(body_text(response).await, "Internal server error");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = app();
    let response = send(&app, Method::POST, "/cart/add/pineapple", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_one_without_session_cart_redirects() {
    let app = app();
    let response = send(&app, Method::POST, "/cart/remove/42", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn remove_one_decrements_then_drops_line() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;
    send(&app, Method::POST, "/cart/add/42", Some(&cookie)).await;

    let response = send(&app, Method::POST, "/cart/remove/42", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
    assert!(cart_page(&app, Some(&cookie)).await.contains("cart-count\">1 items"));

    send(&app, Method::POST, "/cart/remove/42", Some(&cookie)).await;
    let html = cart_page(&app, Some(&cookie)).await;
    assert!(html.contains("Your cart is empty"));
    assert!(!html.contains("data-product-id=\"42\""));
}

#[tokio::test]
async fn add_then_remove_restores_previous_cart() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;
    let before = cart_page(&app, Some(&cookie)).await;

    send(&app, Method::POST, "/cart/add/7", Some(&cookie)).await;
    send(&app, Method::POST, "/cart/remove/7", Some(&cookie)).await;

    assert_eq!(cart_page(&app, Some(&cookie)).await, before);
}

#[tokio::test]
async fn delete_without_session_cart_redirects() {
    let app = app();

    for (method, uri) in [(Method::DELETE, "/cart/42"), (Method::POST, "/cart/delete/42")] {
        let response = send(&app, method, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/cart");
        assert!(session_cookie(&response).is_none());
    }
}

#[tokio::test]
async fn delete_removes_whole_line() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;
    send(&app, Method::POST, "/cart/add/42", Some(&cookie)).await;
    send(&app, Method::POST, "/cart/add/7", Some(&cookie)).await;

    let response = send(&app, Method::DELETE, "/cart/42", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = cart_page(&app, Some(&cookie)).await;
    assert!(!html.contains("data-product-id=\"42\""));
    assert!(html.contains("data-product-id=\"7\""));
    assert!(html.contains("cart-count\">1 items"));
    assert!(html.contains("Subtotal: $3.00"));
}

#[tokio::test]
async fn form_delete_alias_matches_delete() {
    let app = app();
    let cookie = start_cart(&app, "/cart/add/42").await;

    let response = send(&app, Method::POST, "/cart/delete/42", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(cart_page(&app, Some(&cookie)).await.contains("Your cart is empty"));
}

#[tokio::test]
async fn health_endpoints() {
    let app = app();
    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    let response = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let broken = app_with(Arc::new(BrokenLoader));
    let response = send(&broken, Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
