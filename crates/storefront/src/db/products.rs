//! Product repository for database operations.
//!
//! Queries are built at runtime (`query_as`) so the crate compiles without a
//! live database or an offline query cache.

use rust_decimal::Decimal;
use sqlx::PgPool;

use cartkeeper_core::{CurrencyCode, Price, Product, ProductId};

use super::RepositoryError;

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    old_price: Option<Decimal>,
    quantity: i32,
    image: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price, CurrencyCode::default()).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let old_price = row
            .old_price
            .map(|amount| Price::new(amount, CurrencyCode::default()))
            .transpose()
            .map_err(|e| RepositoryError::DataCorruption(format!("product {}: {e}", row.id)))?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {}: negative stock {}",
                row.id, row.quantity
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            price,
            old_price,
            quantity,
            image: row.image,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, old_price, quantity, image
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a product or overwrite the existing row with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stock does not fit the column.
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        let quantity = i32::try_from(product.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {}: stock {} out of range",
                product.id, product.quantity
            ))
        })?;

        sqlx::query(
            r"
            INSERT INTO products (id, name, price, old_price, quantity, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                old_price = EXCLUDED.old_price,
                quantity = EXCLUDED.quantity,
                image = EXCLUDED.image,
                updated_at = now()
            ",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price.amount)
        .bind(product.old_price.map(|p| p.amount))
        .bind(quantity)
        .bind(&product.image)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Check that the database answers queries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self.pool).await?;
        Ok(())
    }
}
