//! The shopper session: every per-shopper aggregate in one place.
//!
//! One session exists per process and lives behind a mutex in
//! [`AppState`](crate::state::AppState). Handlers lock it, mutate, and
//! release before any simulated latency.

use std::sync::Arc;

use crate::cart::CartLedger;
use crate::checkout::CheckoutFlow;
use crate::location::LocationBook;
use crate::notifications::Notifier;
use crate::pricing::{self, Breakdown, CouponState};
use crate::recurring::RecurringStore;
use crate::services::auth::AuthSession;
use crate::storage::{KeyValueStore, StorageError};

/// Cart, coupon, location, recurring items, auth, checkout and toasts.
#[derive(Debug)]
pub struct ShopSession {
    pub cart: CartLedger,
    pub coupon: CouponState,
    pub locations: LocationBook,
    pub recurring: RecurringStore,
    pub auth: AuthSession,
    pub checkout: CheckoutFlow,
    pub notifier: Notifier,
}

impl ShopSession {
    /// Restore every persisted aggregate from `store`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read. Snapshots that fail
    /// to decode are discarded instead.
    pub fn load(store: &Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let session = Self {
            cart: CartLedger::load(Arc::clone(store))?,
            coupon: CouponState::default(),
            locations: LocationBook::load(Arc::clone(store))?,
            recurring: RecurringStore::load(Arc::clone(store))?,
            auth: AuthSession::load(Arc::clone(store))?,
            checkout: CheckoutFlow::default(),
            notifier: Notifier::new(),
        };
        tracing::info!(
            cart_entries = session.cart.entries().len(),
            location_set = session.locations.is_set(),
            recurring_items = session.recurring.list().len(),
            signed_in = session.auth.is_authenticated(),
            "Shopper session restored"
        );
        Ok(session)
    }

    /// Cart page figures for the live ledger and coupon.
    #[must_use]
    pub fn cart_breakdown(&self) -> Breakdown {
        pricing::cart_breakdown(self.cart.subtotal(), self.coupon.coupon())
    }
}
