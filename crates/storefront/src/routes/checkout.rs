//! Checkout route handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use quickcart_core::{DeliveryTier, Price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::CartEntry;
use crate::checkout::{BlockReason, CheckoutForm, CheckoutState, OrderConfirmation};
use crate::error::Result;
use crate::pricing::{self, Breakdown};
use crate::state::AppState;

/// Checkout page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub delivery: DeliveryTier,
}

/// Checkout page data.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub state: CheckoutState,
    pub form: CheckoutForm,
    pub items: Vec<CartEntry>,
    pub breakdown: Breakdown,
    pub total_display: String,
}

/// Show the checkout form, or the confirmation of a completed order.
///
/// Redirects to `/cart` when the cart is empty or no location is set.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<CheckoutQuery>) -> Response {
    let mut guard = state.session().lock().await;
    let session = &mut *guard;

    let flow_state = session
        .checkout
        .enter(&session.cart, session.locations.current())
        .clone();

    if let CheckoutState::Blocked(reason) = flow_state {
        tracing::info!(%reason, "Checkout blocked");
        if reason == BlockReason::NoLocation {
            session.notifier.error(
                "Please set delivery location",
                Some("You need to set a delivery location to proceed with checkout".to_string()),
            );
        }
        return Redirect::to("/cart").into_response();
    }

    let mut form = CheckoutForm::prefill(session.locations.current(), session.auth.user());
    form.delivery = query.delivery;
    let breakdown = pricing::checkout_breakdown(session.cart.subtotal(), query.delivery);

    Json(CheckoutView {
        state: flow_state,
        form,
        items: session.cart.entries().to_vec(),
        total_display: Price::inr(breakdown.total).display(),
        breakdown,
    })
    .into_response()
}

/// Place the order. Responds after the simulated backend latency.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<OrderConfirmation>> {
    let confirmation = state.orders().place_order(form).await?;
    Ok(Json(confirmation))
}

/// Leave the confirmation and start a new order. The cart is left as is.
#[instrument(skip(state))]
pub async fn new_order(State(state): State<AppState>) -> Json<CheckoutState> {
    let mut session = state.session().lock().await;
    session.checkout.start_new_order();
    Json(session.checkout.state().clone())
}
