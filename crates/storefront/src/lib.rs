//! QuickCart storefront library.
//!
//! Catalog, cart ledger, pricing, checkout flow, recurring items, location
//! selection and mock auth, persisted through a key-value snapshot store and
//! served as a JSON API. The binary in `main.rs` and the integration tests
//! both build their router with [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod location;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod pricing;
pub mod recurring;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

use axum::{Router, body::Body, http::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
