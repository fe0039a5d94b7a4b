//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::ProductLoader;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the product loader.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: Arc<dyn ProductLoader>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `products` - Loader the cart handlers fetch products through
    #[must_use]
    pub fn new(config: StorefrontConfig, products: Arc<dyn ProductLoader>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, products }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product loader.
    #[must_use]
    pub fn products(&self) -> &dyn ProductLoader {
        self.inner.products.as_ref()
    }
}
