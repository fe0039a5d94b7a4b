//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! ck-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Applies the SQL migrations in `crates/storefront/migrations/`, then creates
//! the session store schema.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use cartkeeper_storefront::db;

/// Errors raised while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: STOREFRONT_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let database_url = super::database_url().ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
