//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod location;
pub mod recurring;

use std::path::Path;
use std::sync::Arc;

use quickcart_storefront::catalog::{Catalog, CatalogError};
use quickcart_storefront::location::LocationError;
use quickcart_storefront::pricing::PricingError;
use quickcart_storefront::recurring::RecurringError;
use quickcart_storefront::services::AuthError;
use quickcart_storefront::storage::{FileStore, KeyValueStore, StorageError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Recurring(#[from] RecurringError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Not signed in. Run `qc-cli account login` first")]
    NotSignedIn,
}

/// Catalog plus the snapshot store every command works against.
pub struct Context {
    pub catalog: Catalog,
    pub store: Arc<dyn KeyValueStore>,
}

impl Context {
    /// Load the embedded catalog and open the store at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails to parse or the directory
    /// cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, CliError> {
        let store = FileStore::open(data_dir)?;
        tracing::debug!(data_dir = %store.dir().display(), "Opened snapshot store");
        Ok(Self {
            catalog: Catalog::embedded()?,
            store: Arc::new(store),
        })
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub fn in_memory() -> Self {
        Self {
            catalog: Catalog::embedded().unwrap(),
            store: Arc::new(quickcart_storefront::storage::MemoryStore::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quickcart_storefront::cart::CartLedger;

    #[test]
    fn test_open_shares_snapshots_across_runs() {
        let dir = tempfile::tempdir().unwrap();

        let first = Context::open(dir.path()).unwrap();
        cart::add(&first, "p7", 4).unwrap();
        drop(first);

        let second = Context::open(dir.path()).unwrap();
        let ledger = CartLedger::load(Arc::clone(&second.store)).unwrap();
        assert_eq!(ledger.quantity_of("p7"), 4);
        assert!(dir.path().join("cart.json").exists());
    }
}
