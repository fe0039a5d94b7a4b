//! Cart route handlers.
//!
//! The cart lives entirely in the session. Every handler rebuilds it with
//! [`Cart::init`], applies at most one operation, writes it back and either
//! renders the cart page or redirects to it.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::{debug, instrument};

use cartkeeper_core::{Cart, LineItem, ProductId};

use crate::error::{AppError, add_breadcrumb};
use crate::middleware::CartSession;
use crate::state::AppState;

/// Canonical cart page; every mutation redirects here.
pub const CART_PATH: &str = "/cart";

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub old_price: Option<String>,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id().as_i32(),
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            price: line.product.price.display(),
            old_price: line.product.old_price.map(|p| p.display()),
            line_price: line.price.display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            subtotal: cart.total.price.display(),
            item_count: cart.total.quantity,
        }
    }
}

/// Cart page template.
#[derive(Template)]
#[template(path = "cart/index.html")]
pub struct CartIndexTemplate {
    pub cart: CartView,
}

/// Display the cart page.
///
/// An absent session cart renders as an empty cart. Session and rendering
/// failures surface as 500 responses through [`AppError`].
#[instrument(skip_all)]
pub async fn view(cart_session: CartSession) -> Result<Html<String>, AppError> {
    let cart = Cart::init(cart_session.load().await?);

    let page = CartIndexTemplate {
        cart: CartView::from(&cart),
    };

    Ok(Html(page.render()?))
}

/// Add one unit of a product to the cart.
///
/// The product is loaded first; an unknown ID is a 404 and the session is
/// left untouched.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn add_one(
    State(state): State<AppState>,
    cart_session: CartSession,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    let product = state
        .products()
        .load(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let cart = Cart::init(cart_session.load().await?).add_one(&product);
    cart_session.store(&cart).await?;

    let product_id = id.to_string();
    add_breadcrumb(
        "cart",
        "Added one unit",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Redirect::to(CART_PATH))
}

/// Remove one unit of a line item.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn remove_one(
    cart_session: CartSession,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    update_existing_cart(&cart_session, |cart| cart.remove_one(id)).await
}

/// Delete a line item entirely.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    cart_session: CartSession,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    update_existing_cart(&cart_session, |cart| cart.delete(id)).await
}

/// Apply `operation` to the session cart and redirect to the cart page.
///
/// Without a cart in the session there is nothing to change: the session is
/// not written and the client is still redirected.
async fn update_existing_cart(
    cart_session: &CartSession,
    operation: impl FnOnce(Cart) -> Cart + Send,
) -> Result<Redirect, AppError> {
    let Some(stored) = cart_session.load().await? else {
        debug!("No cart in session");
        return Ok(Redirect::to(CART_PATH));
    };

    let cart = operation(Cart::init(Some(stored)));
    cart_session.store(&cart).await?;

    Ok(Redirect::to(CART_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartkeeper_core::{CurrencyCode, Price, Product};

    use super::*;

    fn product(id: i32, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(cents, CurrencyCode::USD),
            old_price: Some(Price::from_cents(cents + 100, CurrencyCode::USD)),
            quantity: 10,
            image: Some(format!("products/{id}.jpg")),
        }
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let cart = Cart::init(None)
            .add_one(&product(1, 1250))
            .add_one(&product(1, 1250))
            .add_one(&product(2, 300));
        let view = CartView::from(&cart);

        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$28.00");

        let first = view.items.first().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, "$12.50");
        assert_eq!(first.old_price.as_deref(), Some("$13.50"));
        assert_eq!(first.line_price, "$25.00");
    }

    #[test]
    fn test_empty_cart_renders() {
        let html = CartIndexTemplate {
            cart: CartView::from(&Cart::init(None)),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your cart is empty"));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn test_cart_renders_line_actions() {
        let html = CartIndexTemplate {
            cart: CartView::from(&Cart::init(None).add_one(&product(42, 999))),
        }
        .render()
        .unwrap();

        assert!(html.contains("Product 42"));
        assert!(html.contains("action=\"/cart/add/42\""));
        assert!(html.contains("action=\"/cart/remove/42\""));
        assert!(html.contains("action=\"/cart/delete/42\""));
        assert!(!html.contains("Your cart is empty"));
    }
}
