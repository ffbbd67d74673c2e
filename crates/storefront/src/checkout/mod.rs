//! Order placement flow.
//!
//! ```text
//!            enter                begin_submission            complete
//! Blocked <-------- Editing ---> Validating ---> Submitting ---------> Complete
//!                      ^             |                                    |
//!                      +-- invalid --+                                    |
//!                      +---------------- start_new_order -----------------+
//! ```
//!
//! `Blocked` means the cart is empty or no delivery location is set. The
//! flow is a plain state value; the latency between `Submitting` and
//! `Complete` is awaited by the caller via [`simulate_submission`] with the
//! session lock released.

mod form;
mod order;

pub use form::{CheckoutForm, DEFAULT_CITY, DEFAULT_POSTAL_CODE, FieldError};
pub use order::{OrderConfirmation, OrderItem, OrderReference, PendingOrder};

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::cart::CartLedger;
use crate::location::Location;
use crate::pricing;
use crate::storage::StorageError;

/// Why checkout cannot be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    EmptyCart,
    NoLocation,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCart => write!(f, "cart is empty"),
            Self::NoLocation => write!(f, "no delivery location set"),
        }
    }
}

/// Checkout flow errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout blocked: {0}")]
    Blocked(BlockReason),

    #[error("checkout form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("order is already being submitted")]
    AlreadySubmitting,

    #[error("no order is being submitted")]
    NotSubmitting,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where the shopper is in the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Editing,
    Validating,
    Submitting,
    Complete(Box<OrderConfirmation>),
    Blocked(BlockReason),
}

/// Per-session checkout state machine.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    state: CheckoutState,
    pending: Option<PendingOrder>,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting)
    }

    /// Order captured by the in-flight submission.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingOrder> {
        self.pending.as_ref()
    }

    /// Re-evaluate on arriving at checkout.
    ///
    /// An in-flight submission is left alone. A completed order keeps showing
    /// its confirmation until the cart is refilled, after which the new cart
    /// is gated like any other: an empty cart blocks first, then a missing
    /// location.
    pub fn enter(&mut self, cart: &CartLedger, location: Option<&Location>) -> &CheckoutState {
        match self.state {
            CheckoutState::Submitting => {}
            CheckoutState::Complete(_) if cart.is_empty() => {}
            _ => {
                self.state = Self::gate(cart, location)
                    .map_or(CheckoutState::Editing, CheckoutState::Blocked);
            }
        }
        &self.state
    }

    fn gate(cart: &CartLedger, location: Option<&Location>) -> Option<BlockReason> {
        if cart.is_empty() {
            Some(BlockReason::EmptyCart)
        } else if location.is_none() {
            Some(BlockReason::NoLocation)
        } else {
            None
        }
    }

    /// Validate the form and, if it passes, capture the order and move to
    /// `Submitting`.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitting` while a previous submission is in flight.
    /// - `Blocked` if the cart is empty or no location is set.
    /// - `Validation` with every invalid field; the flow returns to
    ///   `Editing` and nothing is persisted.
    pub fn begin_submission(
        &mut self,
        form: &CheckoutForm,
        cart: &CartLedger,
        location: Option<&Location>,
    ) -> Result<&PendingOrder, CheckoutError> {
        if self.is_submitting() {
            return Err(CheckoutError::AlreadySubmitting);
        }
        if let Some(reason) = Self::gate(cart, location) {
            self.state = CheckoutState::Blocked(reason);
            return Err(CheckoutError::Blocked(reason));
        }

        self.state = CheckoutState::Validating;
        let errors = form.validate();
        if !errors.is_empty() {
            tracing::info!(invalid_fields = errors.len(), "Checkout form rejected");
            self.state = CheckoutState::Editing;
            return Err(CheckoutError::Validation(errors));
        }

        let pending = PendingOrder {
            items: cart.entries().iter().map(OrderItem::from).collect(),
            delivery: form.delivery,
            payment: form.payment,
            breakdown: pricing::checkout_breakdown(cart.subtotal(), form.delivery),
            customer_name: form.name.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            delivery_address: form.delivery_address(),
        };
        tracing::info!(
            items = pending.items.len(),
            total = %pending.breakdown.total,
            delivery = %pending.delivery,
            "Submitting order"
        );

        self.state = CheckoutState::Submitting;
        Ok(self.pending.insert(pending))
    }

    /// Finish the in-flight submission: clear the cart and issue a reference.
    ///
    /// # Errors
    ///
    /// Returns `NotSubmitting` outside `Submitting`, or a storage error if the
    /// cart cannot be cleared (the flow then returns to `Editing`).
    pub fn complete(&mut self, cart: &mut CartLedger) -> Result<OrderConfirmation, CheckoutError> {
        if !self.is_submitting() {
            return Err(CheckoutError::NotSubmitting);
        }
        let pending = self.pending.take().ok_or(CheckoutError::NotSubmitting)?;

        if let Err(err) = cart.clear() {
            self.state = CheckoutState::Editing;
            return Err(err.into());
        }

        let confirmation = OrderConfirmation::from_pending(pending, OrderReference::generate());
        tracing::info!(
            order_id = %confirmation.reference.order_id,
            reference = %confirmation.reference.display,
            "Order placed"
        );

        self.state = CheckoutState::Complete(Box::new(confirmation.clone()));
        Ok(confirmation)
    }

    /// Leave the confirmation. The cart was emptied by [`Self::complete`];
    /// anything added since is kept. Ignored while a submission is in flight.
    pub fn start_new_order(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.pending = None;
        self.state = CheckoutState::Editing;
    }
}

/// Stand-in for the order backend round trip.
pub async fn simulate_submission(latency: Duration) {
    tokio::time::sleep(latency).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use quickcart_core::{DeliveryTier, PaymentMethod};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::tests::product;
    use crate::location;
    use crate::storage::MemoryStore;

    fn cart_with(price: i64) -> CartLedger {
        let mut cart = CartLedger::load(Arc::new(MemoryStore::new())).unwrap();
        cart.add(&product("p1", price), 1).unwrap();
        cart
    }

    fn valid_form(delivery: DeliveryTier) -> CheckoutForm {
        CheckoutForm {
            name: "Asha".to_string(),
            email: "asha@example.in".to_string(),
            phone: "9876543210".to_string(),
            delivery,
            payment: PaymentMethod::Cod,
            ..CheckoutForm::prefill(location::candidate("1"), None)
        }
    }

    #[test]
    fn test_enter_blocks_empty_cart_first() {
        let empty = CartLedger::load(Arc::new(MemoryStore::new())).unwrap();
        let mut flow = CheckoutFlow::default();

        assert_eq!(
            flow.enter(&empty, None),
            &CheckoutState::Blocked(BlockReason::EmptyCart)
        );
        assert_eq!(
            flow.enter(&cart_with(50), None),
            &CheckoutState::Blocked(BlockReason::NoLocation)
        );
        assert_eq!(
            flow.enter(&cart_with(50), location::candidate("1")),
            &CheckoutState::Editing
        );
    }

    #[test]
    fn test_invalid_form_returns_to_editing() {
        let cart = cart_with(50);
        let mut flow = CheckoutFlow::default();

        let err = flow
            .begin_submission(&CheckoutForm::default(), &cart, location::candidate("1"))
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(ref e) if !e.is_empty()));
        assert_eq!(flow.state(), &CheckoutState::Editing);
        assert!(flow.pending().is_none());
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_double_submit_rejected() {
        let cart = cart_with(50);
        let mut flow = CheckoutFlow::default();
        let form = valid_form(DeliveryTier::Standard);

        flow.begin_submission(&form, &cart, location::candidate("1")).unwrap();
        assert!(matches!(
            flow.begin_submission(&form, &cart, location::candidate("1")),
            Err(CheckoutError::AlreadySubmitting)
        ));
    }

    #[test]
    fn test_standard_order_total_and_completion() {
        let mut cart = cart_with(50);
        let mut flow = CheckoutFlow::default();

        let pending = flow
            .begin_submission(&valid_form(DeliveryTier::Standard), &cart, location::candidate("1"))
            .unwrap();
        assert_eq!(pending.breakdown.total, Decimal::new(725, 1));

        let confirmation = flow.complete(&mut cart).unwrap();

        assert!(cart.is_empty());
        assert!(confirmation.reference.display.starts_with("BK"));
        assert_eq!(confirmation.delivery_label, "Standard Delivery");
        assert_eq!(confirmation.items[0].price, Decimal::from(50));
        assert!(matches!(flow.state(), CheckoutState::Complete(_)));

        // Empty cart does not bounce a completed order back to the cart page.
        assert!(matches!(flow.enter(&cart, None), CheckoutState::Complete(_)));
    }

    #[test]
    fn test_complete_requires_submission() {
        let mut cart = cart_with(50);
        let mut flow = CheckoutFlow::default();
        assert!(matches!(
            flow.complete(&mut cart),
            Err(CheckoutError::NotSubmitting)
        ));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_start_new_order() {
        let mut cart = cart_with(50);
        let mut flow = CheckoutFlow::default();
        flow.begin_submission(&valid_form(DeliveryTier::Express), &cart, location::candidate("2"))
            .unwrap();
        flow.complete(&mut cart).unwrap();

        flow.start_new_order();

        assert_eq!(flow.state(), &CheckoutState::Editing);
        assert!(cart.is_empty());
        assert_eq!(
            flow.enter(&cart, location::candidate("2")),
            &CheckoutState::Blocked(BlockReason::EmptyCart)
        );
    }

    #[test]
    fn test_refilled_cart_leaves_confirmation() {
        let mut cart = cart_with(50);
        let mut flow = CheckoutFlow::default();
        flow.begin_submission(&valid_form(DeliveryTier::Standard), &cart, location::candidate("1"))
            .unwrap();
        flow.complete(&mut cart).unwrap();

        cart.add(&product("p2", 20), 3).unwrap();
        assert_eq!(flow.enter(&cart, location::candidate("1")), &CheckoutState::Editing);
        assert_eq!(cart.total_items(), 3);

        flow.start_new_order();
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_start_new_order_keeps_refilled_cart() {
        let mut cart = cart_with(50);
        let mut flow = CheckoutFlow::default();
        flow.begin_submission(&valid_form(DeliveryTier::Standard), &cart, location::candidate("1"))
            .unwrap();
        flow.complete(&mut cart).unwrap();

        cart.add(&product("p2", 20), 3).unwrap();
        flow.start_new_order();

        assert_eq!(flow.state(), &CheckoutState::Editing);
        assert_eq!(cart.quantity_of("p2"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency() {
        let start = tokio::time::Instant::now();
        simulate_submission(Duration::from_millis(1500)).await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
