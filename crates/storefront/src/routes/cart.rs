//! Cart route handlers.
//!
//! Every mutation answers with the full cart view so clients can re-render
//! from a single response.

use axum::{Json, extract::State};
use quickcart_core::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::CartEntry;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::location::Location;
use crate::pricing::{Breakdown, COUPON_CODE, CouponOutcome};
use crate::session::ShopSession;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    #[serde(flatten)]
    pub entry: CartEntry,
    pub line_total: Decimal,
    pub line_total_display: String,
}

/// Cart page data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub breakdown: Breakdown,
    pub total_display: String,
    pub free_delivery: bool,
    pub coupon_applied: bool,
    pub location: Option<Location>,
}

impl From<&ShopSession> for CartView {
    fn from(session: &ShopSession) -> Self {
        let breakdown = session.cart_breakdown();
        Self {
            items: session
                .cart
                .entries()
                .iter()
                .map(|entry| CartItemView {
                    entry: entry.clone(),
                    line_total: entry.line_total(),
                    line_total_display: Price::inr(entry.line_total()).display(),
                })
                .collect(),
            item_count: session.cart.total_items(),
            total_display: Price::inr(breakdown.total).display(),
            free_delivery: breakdown.free_delivery(),
            breakdown,
            coupon_applied: session.coupon.is_applied(),
            location: session.locations.current().cloned(),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update quantity request. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove one unit request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Coupon request.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Coupon response.
#[derive(Debug, Serialize)]
pub struct CouponView {
    pub outcome: CouponOutcome,
    pub cart: CartView,
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::from(&*session))
}

/// Add a product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .product(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;
    let quantity = form.quantity.unwrap_or(1);

    let mut session = state.session().lock().await;
    session.cart.add(product, quantity)?;
    session
        .notifier
        .success("Added to cart", Some(format!("{} added to your cart", product.name)));
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(CartView::from(&*session)))
}

/// Set the quantity of a cart line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.cart.set_quantity(&form.product_id, form.quantity)?;
    Ok(Json(CartView::from(&*session)))
}

/// Remove one unit of a product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.cart.remove(&form.product_id)?;
    Ok(Json(CartView::from(&*session)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.cart.clear()?;
    session.notifier.info("Cart cleared", None);
    Ok(Json(CartView::from(&*session)))
}

/// Apply a coupon code to the cart.
#[instrument(skip(state))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(form): Json<CouponForm>,
) -> Result<Json<CouponView>> {
    let mut session = state.session().lock().await;

    let outcome = match session.coupon.apply(&form.code) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::info!(code = %form.code, "Coupon rejected");
            session.notifier.error(
                "Invalid coupon code",
                Some(format!("Try {COUPON_CODE} for 10% off")),
            );
            return Err(err.into());
        }
    };

    match outcome {
        CouponOutcome::Applied => {
            session.notifier.success(
                "Coupon applied successfully!",
                Some("You got 10% off up to ₹50".to_string()),
            );
        }
        CouponOutcome::AlreadyApplied => {
            session.notifier.info("Coupon already applied", None);
        }
    }

    Ok(Json(CouponView {
        outcome,
        cart: CartView::from(&*session),
    }))
}
