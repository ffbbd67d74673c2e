//! Recurring item store.
//!
//! A plain list of "re-order this" entries owned by the signed-in user.
//! Frequency and time of day are stored metadata; nothing schedules
//! deliveries from them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quickcart_core::{DeliveryTime, Frequency, ProductId, RecurringItemId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::storage::{
    KeyValueStore, StorageError, keys, load_snapshot_or_default, save_snapshot,
};

/// Recurring store errors.
#[derive(Debug, Error)]
pub enum RecurringError {
    #[error("recurring item not found: {0}")]
    NotFound(String),

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A product the user wants delivered repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringItem {
    pub id: RecurringItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub frequency: Frequency,
    pub delivery_time: DeliveryTime,
    pub is_active: bool,
    pub auto_pay_enabled: bool,
    pub next_delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User input for a new recurring item.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringDraft {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub delivery_time: DeliveryTime,
    #[serde(default)]
    pub auto_pay_enabled: bool,
}

const fn default_quantity() -> u32 {
    1
}

/// Insertion-ordered list of recurring items, persisted after each change.
pub struct RecurringStore {
    items: Vec<RecurringItem>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for RecurringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurringStore")
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl RecurringStore {
    /// Restore the list from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let items = load_snapshot_or_default(store.as_ref(), keys::RECURRING_ITEMS)?;
        Ok(Self { items, store })
    }

    #[must_use]
    pub fn list(&self) -> &[RecurringItem] {
        &self.items
    }

    /// Items belonging to `owner`.
    pub fn owned_by<'a>(&'a self, owner: &'a UserId) -> impl Iterator<Item = &'a RecurringItem> {
        self.items.iter().filter(move |i| &i.user_id == owner)
    }

    /// Validate and append a new item.
    ///
    /// # Errors
    ///
    /// Returns `RecurringError::UnknownProduct` if the product is not in the
    /// catalog, `RecurringError::InvalidQuantity` for a zero quantity, or a
    /// storage error.
    pub fn add(
        &mut self,
        owner: &UserId,
        draft: RecurringDraft,
        catalog: &Catalog,
    ) -> Result<RecurringItem, RecurringError> {
        if catalog.product(draft.product_id.as_str()).is_none() {
            return Err(RecurringError::UnknownProduct(draft.product_id));
        }
        if draft.quantity == 0 {
            return Err(RecurringError::InvalidQuantity);
        }

        let now = Utc::now();
        let item = RecurringItem {
            id: RecurringItemId::new(format!("ri-{}", uuid::Uuid::new_v4().simple())),
            user_id: owner.clone(),
            product_id: draft.product_id,
            quantity: draft.quantity,
            frequency: draft.frequency,
            delivery_time: draft.delivery_time,
            is_active: true,
            auto_pay_enabled: draft.auto_pay_enabled,
            next_delivery_date: now,
            created_at: now,
            updated_at: now,
        };
        tracing::info!(item_id = %item.id, product_id = %item.product_id, frequency = %item.frequency, "Recurring item added");

        self.items.push(item.clone());
        self.persist()?;
        Ok(item)
    }

    /// Remove one of `owner`'s items by id.
    ///
    /// # Errors
    ///
    /// Returns `RecurringError::NotFound` if `owner` has no item with this id.
    pub fn delete(&mut self, owner: &UserId, id: &str) -> Result<RecurringItem, RecurringError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id.as_str() == id && &i.user_id == owner)
            .ok_or_else(|| RecurringError::NotFound(id.to_owned()))?;
        let removed = self.items.remove(index);
        tracing::info!(item_id = %removed.id, "Recurring item deleted");
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StorageError> {
        save_snapshot(self.store.as_ref(), keys::RECURRING_ITEMS, &self.items)
    }
}
