//! Delivery location handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::location::{self, Location};
use crate::state::AppState;

/// Location search query.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub q: String,
}

/// Location selection request.
#[derive(Debug, Deserialize)]
pub struct SelectLocationForm {
    pub id: String,
}

/// Location picker data.
#[derive(Debug, Serialize)]
pub struct LocationView {
    pub current: Option<Location>,
    pub recent: Vec<Location>,
    pub results: Vec<Location>,
}

/// Current and recent locations plus search results for `q`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Json<LocationView> {
    let session = state.session().lock().await;
    Json(LocationView {
        current: session.locations.current().cloned(),
        recent: session.locations.recent().to_vec(),
        results: location::search(&query.q).into_iter().cloned().collect(),
    })
}

/// Select a delivery location.
#[instrument(skip(state))]
pub async fn select(
    State(state): State<AppState>,
    Json(form): Json<SelectLocationForm>,
) -> Result<Json<Location>> {
    let mut session = state.session().lock().await;
    let selected = match session.locations.select_by_id(&form.id) {
        Ok(location) => location.clone(),
        Err(err) => {
            session.notifier.error("Location not found", None);
            return Err(err.into());
        }
    };
    session
        .notifier
        .success("Location updated", Some(selected.address.clone()));
    Ok(Json(selected))
}
