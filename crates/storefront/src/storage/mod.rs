//! Snapshot storage for the shopper session.
//!
//! Every aggregate (cart, current location, recent locations, signed-in
//! user, recurring items) is written as a single JSON value under a fixed
//! key after each mutation and read back once at start-up. There is no
//! versioning and no transaction across keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`] or while (de)serializing snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file system operation failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot for key {key} is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key/value storage, the local-storage equivalent.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage keys, one per aggregate.
pub mod keys {
    /// Cart ledger entries.
    pub const CART: &str = "cart";

    /// Currently selected delivery location.
    pub const USER_LOCATION: &str = "userLocation";

    /// Up to three most recently selected locations.
    pub const RECENT_LOCATIONS: &str = "recentLocations";

    /// Signed-in user profile.
    pub const USER: &str = "user";

    /// `"true"` while a user is signed in.
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";

    /// Recurring item list.
    pub const RECURRING_ITEMS: &str = "recurringItems";
}

/// Read and decode the snapshot stored under `key`.
///
/// # Errors
///
/// Returns `StorageError::Json` if the stored value does not decode as `T`.
pub fn load_snapshot<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Json {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Like [`load_snapshot`], but a snapshot that fails to decode is logged and
/// treated as absent so the aggregate starts empty.
///
/// # Errors
///
/// Returns `StorageError` only when the store itself cannot be read.
pub fn load_snapshot_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T, StorageError> {
    match load_snapshot(store, key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(StorageError::Json { key, source }) => {
            tracing::warn!(%key, error = %source, "Discarding unreadable snapshot");
            Ok(T::default())
        }
        Err(other) => Err(other),
    }
}

/// Encode `value` and overwrite the snapshot under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or writing fails.
pub fn save_snapshot<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)?;
    tracing::debug!(%key, bytes = raw.len(), "Snapshot written");
    Ok(())
}
