//! Product lookup used by the cart handlers.
//!
//! Handlers only see the [`ProductLoader`] trait. Production wires in
//! [`PgProductLoader`]; tests and local demos use [`StaticProductLoader`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use cartkeeper_core::{Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};

/// Maximum number of products held in the lookup cache.
const CACHE_CAPACITY: u64 = 1000;

/// Loads a single product by ID.
#[async_trait]
pub trait ProductLoader: Send + Sync {
    /// Load the product with `id`.
    ///
    /// Returns `Ok(None)` when no such product exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing store fails.
    async fn load(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing store cannot be queried.
    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// `PostgreSQL`-backed loader with an in-process TTL cache.
///
/// Only hits are cached, so a product created after a miss shows up on the
/// next request.
#[derive(Clone)]
pub struct PgProductLoader {
    pool: PgPool,
    cache: Cache<ProductId, Product>,
}

impl PgProductLoader {
    /// Create a loader over `pool` whose cache entries live for `ttl`.
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();

        Self { pool, cache }
    }
}

#[async_trait]
impl ProductLoader for PgProductLoader {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn load(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        if let Some(product) = self.cache.get(&id).await {
            debug!("Cache hit for product");
            return Ok(Some(product));
        }

        let product = ProductRepository::new(&self.pool).get_by_id(id).await?;

        if let Some(product) = &product {
            self.cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        ProductRepository::new(&self.pool).ping().await
    }
}

/// In-memory catalogue.
#[derive(Debug, Clone, Default)]
pub struct StaticProductLoader {
    products: Arc<HashMap<ProductId, Product>>,
}

impl StaticProductLoader {
    /// Create a loader serving exactly `products`.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: Arc::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl ProductLoader for StaticProductLoader {
    async fn load(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.get(&id).cloned())
    }
}
