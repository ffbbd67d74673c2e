//! Order placement across the simulated backend latency.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::checkout::{CheckoutError, CheckoutForm, OrderConfirmation, simulate_submission};
use crate::session::ShopSession;

/// Errors from [`OrderService::place_order`].
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The background completion task panicked or was cancelled.
    #[error("order submission interrupted: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Places orders against the shared shopper session.
#[derive(Debug, Clone)]
pub struct OrderService {
    session: Arc<Mutex<ShopSession>>,
    latency: Duration,
}

impl OrderService {
    #[must_use]
    pub const fn new(session: Arc<Mutex<ShopSession>>, latency: Duration) -> Self {
        Self { session, latency }
    }

    /// Validate, wait out the backend latency, then complete the order.
    ///
    /// The session lock is held only to start and to finish the submission,
    /// so other requests proceed during the wait. Completion runs on its own
    /// task and finishes even if the caller goes away; a second submission
    /// meanwhile is rejected with `AlreadySubmitting`.
    ///
    /// # Errors
    ///
    /// Returns the checkout rejection (blocked, invalid form, already
    /// submitting), a storage failure while clearing the cart, or
    /// `Interrupted` if the completion task dies.
    pub async fn place_order(&self, form: CheckoutForm) -> Result<OrderConfirmation, OrderError> {
        {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            let rejection = session
                .checkout
                .begin_submission(&form, &session.cart, session.locations.current())
                .err();
            if let Some(err) = rejection {
                notify_rejection(session, &err);
                return Err(err.into());
            }
        }

        let shared = Arc::clone(&self.session);
        let latency = self.latency;
        let completion = tokio::spawn(async move {
            simulate_submission(latency).await;

            let mut guard = shared.lock().await;
            let session = &mut *guard;
            let result = session.checkout.complete(&mut session.cart);
            match &result {
                Ok(confirmation) => {
                    session.coupon.reset();
                    session.notifier.success(
                        "Order placed successfully!",
                        Some(format!("Order #{}", confirmation.reference.display)),
                    );
                }
                Err(err) => {
                    tracing::error!(error = %err, "Order completion failed");
                    session.notifier.error("Could not place order", Some(err.to_string()));
                }
            }
            result
        });

        Ok(completion.await??)
    }
}

fn notify_rejection(session: &mut ShopSession, err: &CheckoutError) {
    let (title, description) = match err {
        CheckoutError::Validation(_) => (
            "Please fill all required fields",
            "Check the highlighted fields and try again".to_string(),
        ),
        CheckoutError::Blocked(reason) => ("Cannot place order", reason.to_string()),
        CheckoutError::AlreadySubmitting => return,
        other => ("Could not place order", other.to_string()),
    };
    session.notifier.error(title, Some(description));
}
