//! Seed the product catalogue from a YAML file.
//!
//! # File Format
//!
//! ```yaml
//! - id: 42
//!   name: Dried Pineapple Rings
//!   price_cents: 1250
//!   old_price_cents: 1500
//!   quantity: 20
//!   image: products/rings.jpg
//! ```
//!
//! Rows are upserted by `id`, so re-running the command updates prices and
//! stock in place.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use cartkeeper_core::{CurrencyCode, Price, Product, ProductId};
use cartkeeper_storefront::db::{self, ProductRepository, RepositoryError};

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalogue: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid catalogue entry {id}: {reason}")]
    Invalid { id: i32, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One product in the catalogue file.
#[derive(Debug, Deserialize)]
struct CatalogueEntry {
    id: i32,
    name: String,
    price_cents: u32,
    #[serde(default)]
    old_price_cents: Option<u32>,
    quantity: u32,
    #[serde(default)]
    image: Option<String>,
}

impl TryFrom<CatalogueEntry> for Product {
    type Error = SeedError;

    fn try_from(entry: CatalogueEntry) -> Result<Self, Self::Error> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(SeedError::Invalid {
                id: entry.id,
                reason: "name is empty".to_string(),
            });
        }
        if entry.id <= 0 {
            return Err(SeedError::Invalid {
                id: entry.id,
                reason: "id must be positive".to_string(),
            });
        }

        Ok(Self {
            id: ProductId::new(entry.id),
            name: name.to_string(),
            price: Price::from_cents(entry.price_cents, CurrencyCode::default()),
            old_price: entry
                .old_price_cents
                .map(|cents| Price::from_cents(cents, CurrencyCode::default())),
            quantity: entry.quantity,
            image: entry.image,
        })
    }
}

/// Parse and validate a catalogue document.
fn parse_catalogue(content: &str) -> Result<Vec<Product>, SeedError> {
    let entries: Vec<CatalogueEntry> = serde_yaml::from_str(content)?;

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|entry| {
            if !seen.insert(entry.id) {
                return Err(SeedError::Invalid {
                    id: entry.id,
                    reason: "duplicate id".to_string(),
                });
            }
            Product::try_from(entry)
        })
        .collect()
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if the
/// database rejects a row.
pub async fn products(file_path: &str) -> Result<(), SeedError> {
    let content = tokio::fs::read_to_string(Path::new(file_path))
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.to_string(),
            source,
        })?;

    // Validate before connecting to the database
    let products = parse_catalogue(&content)?;
    info!(path = %file_path, products = products.len(), "Parsed catalogue");

    let database_url = super::database_url().ok_or(SeedError::MissingDatabaseUrl)?;
    let pool = db::create_pool(&database_url).await?;
    let repository = ProductRepository::new(&pool);

    for product in &products {
        repository.upsert(product).await?;
        info!(product_id = %product.id, name = %product.name, "Upserted product");
    }

    info!("Seeding complete!");
    Ok(())
}
