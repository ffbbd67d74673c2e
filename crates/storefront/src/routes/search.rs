//! Catalog search route handler.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::Product;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results.
#[derive(Serialize)]
pub struct SearchResults<'a> {
    pub query: &'a str,
    pub results: Vec<&'a Product>,
    pub total: usize,
}

/// Case-insensitive product search. A blank query returns no results.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let results = state.catalog().search(&query.q);
    tracing::debug!(results = results.len(), "Search completed");

    Json(SearchResults {
        query: &query.q,
        total: results.len(),
        results,
    })
    .into_response()
}
