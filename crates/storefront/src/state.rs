//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::{AuthService, OrderService};
use crate::session::ShopSession;
use crate::storage::{KeyValueStore, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog and the shopper session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    session: Arc<Mutex<ShopSession>>,
}

impl AppState {
    /// Create a new application state, restoring the shopper session from
    /// `store`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        store: &Arc<dyn KeyValueStore>,
    ) -> Result<Self, StorageError> {
        let session = ShopSession::load(store)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session: Arc::new(Mutex::new(session)),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The shopper session. Hold the lock only for in-memory work.
    #[must_use]
    pub fn session(&self) -> &Arc<Mutex<ShopSession>> {
        &self.inner.session
    }

    /// Mock authentication with the configured latency.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.inner.config.auth_latency)
    }

    /// Order placement with the configured latency.
    #[must_use]
    pub fn orders(&self) -> OrderService {
        OrderService::new(Arc::clone(&self.inner.session), self.inner.config.order_latency)
    }
}
