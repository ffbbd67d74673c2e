//! Home page route handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{Category, Product};
use crate::state::AppState;

/// Home page data.
#[derive(Serialize)]
pub struct HomeView<'a> {
    pub categories: &'a [Category],
    pub featured: Vec<&'a Product>,
}

/// Categories and featured products.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Response {
    let catalog = state.catalog();
    Json(HomeView {
        categories: catalog.categories(),
        featured: catalog.featured(),
    })
    .into_response()
}
