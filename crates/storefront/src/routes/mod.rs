//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Categories and featured products
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /category/{id}          - Category products (?subcategory, ?sort, ?min_price, ?max_price)
//! GET  /product/{id}           - Product detail with related products
//! GET  /search?q=              - Product search
//!
//! # Cart
//! GET  /cart                   - Cart with pricing breakdown
//! POST /cart/add               - Add product ({product_id, quantity?})
//! POST /cart/update            - Set quantity ({product_id, quantity})
//! POST /cart/remove            - Remove one unit ({product_id})
//! POST /cart/clear             - Empty the cart
//! POST /cart/coupon            - Apply coupon ({code})
//!
//! # Checkout
//! GET  /checkout               - Form and breakdown (?delivery); 303 to /cart when blocked
//! POST /checkout               - Place order
//! POST /checkout/new           - Start a new order
//!
//! # Auth
//! POST /login                  - Mock login
//! POST /signup                 - Mock signup
//! POST /logout                 - Sign out
//!
//! # Location
//! GET  /location?q=            - Current, recent and matching locations
//! POST /location               - Select location ({id})
//!
//! # Recurring orders (requires auth)
//! GET    /recurring-orders       - List
//! POST   /recurring-orders       - Add
//! DELETE /recurring-orders/{id}  - Delete
//!
//! # Notifications
//! GET    /notifications          - Active toasts
//! DELETE /notifications/{id}     - Dismiss a toast
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod location;
pub mod notifications;
pub mod products;
pub mod recurring;
pub mod search;

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/coupon", post(cart::apply_coupon))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/new", post(checkout::new_order))
}

/// Create the recurring order routes router.
pub fn recurring_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recurring::index).post(recurring::create))
        .route("/{id}", delete(recurring::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/category/{id}", get(products::category))
        .route("/product/{id}", get(products::show))
        .route("/search", get(search::search))
        // Cart and checkout
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        // Auth
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        // Location
        .route("/location", get(location::show).post(location::select))
        // Recurring orders
        .nest("/recurring-orders", recurring_routes())
        // Toasts
        .route("/notifications", get(notifications::index))
        .route("/notifications/{id}", delete(notifications::dismiss))
        .fallback(not_found)
}

/// JSON 404 for unknown paths.
async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(%uri, "No route");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found", "path": uri.path() })),
    )
}
