//! Delivery location selection.
//!
//! There is no geocoding: locations come from a fixed candidate list and are
//! matched by substring. The book remembers the current location and the
//! three most recently chosen ones, each under its own storage key.

use std::sync::Arc;
use std::sync::LazyLock;

use quickcart_core::LocationId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{
    KeyValueStore, StorageError, keys, load_snapshot_or_default, save_snapshot,
};

/// How many recently used locations are kept.
pub const RECENT_LIMIT: usize = 3;

/// Location selection errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A deliverable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    /// Short form shown in the header (e.g., "HSR Layout, Bengaluru").
    pub address: String,
    pub full_address: String,
    pub lat: f64,
    pub lng: f64,
}

static CANDIDATES: LazyLock<Vec<Location>> = LazyLock::new(|| {
    vec![
        Location {
            id: LocationId::new("1"),
            address: "HSR Layout, Bengaluru".to_string(),
            full_address: "1st Main, HSR Layout, Bengaluru, Karnataka 560102".to_string(),
            lat: 12.9141,
            lng: 77.6806,
        },
        Location {
            id: LocationId::new("2"),
            address: "Indiranagar, Bengaluru".to_string(),
            full_address: "12th Main, Indiranagar, Bengaluru, Karnataka 560038".to_string(),
            lat: 12.9784,
            lng: 77.6408,
        },
        Location {
            id: LocationId::new("3"),
            address: "Koramangala, Bengaluru".to_string(),
            full_address: "7th Block, Koramangala, Bengaluru, Karnataka 560095".to_string(),
            lat: 12.9279,
            lng: 77.6271,
        },
    ]
});

/// Every selectable location.
#[must_use]
pub fn candidates() -> &'static [Location] {
    &CANDIDATES
}

/// Candidate with the given id.
#[must_use]
pub fn candidate(id: &str) -> Option<&'static Location> {
    CANDIDATES.iter().find(|l| l.id.as_str() == id)
}

/// Case-insensitive substring search over short and full address.
/// A blank query returns nothing.
#[must_use]
pub fn search(query: &str) -> Vec<&'static Location> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    CANDIDATES
        .iter()
        .filter(|l| {
            l.address.to_lowercase().contains(&needle)
                || l.full_address.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Current delivery location plus recent history.
pub struct LocationBook {
    current: Option<Location>,
    recent: Vec<Location>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocationBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationBook")
            .field("current", &self.current)
            .field("recent", &self.recent)
            .finish_non_exhaustive()
    }
}

impl LocationBook {
    /// Restore current and recent locations from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let current: Option<Location> =
            load_snapshot_or_default(store.as_ref(), keys::USER_LOCATION)?;
        let mut recent: Vec<Location> =
            load_snapshot_or_default(store.as_ref(), keys::RECENT_LOCATIONS)?;
        recent.truncate(RECENT_LIMIT);

        Ok(Self {
            current,
            recent,
            store,
        })
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn recent(&self) -> &[Location] {
        &self.recent
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.current.is_some()
    }

    /// Make `location` current and move it to the front of the recent list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either snapshot cannot be written.
    pub fn select(&mut self, location: Location) -> Result<(), StorageError> {
        self.recent.retain(|l| l.id != location.id);
        self.recent.insert(0, location.clone());
        self.recent.truncate(RECENT_LIMIT);

        tracing::info!(location_id = %location.id, address = %location.address, "Location selected");
        self.current = Some(location);

        save_snapshot(self.store.as_ref(), keys::USER_LOCATION, &self.current)?;
        save_snapshot(self.store.as_ref(), keys::RECENT_LOCATIONS, &self.recent)
    }

    /// Select one of the [`candidates`] by id.
    ///
    /// # Errors
    ///
    /// Returns `LocationError::UnknownLocation` for ids outside the candidate
    /// list, or a storage error.
    pub fn select_by_id(&mut self, id: &str) -> Result<&Location, LocationError> {
        let location = candidate(id)
            .ok_or_else(|| LocationError::UnknownLocation(id.to_owned()))?
            .clone();
        self.select(location)?;
        self.current
            .as_ref()
            .ok_or_else(|| LocationError::UnknownLocation(id.to_owned()))
    }
}
