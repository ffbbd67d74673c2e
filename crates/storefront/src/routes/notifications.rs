//! Toast notification handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::notifications::Toast;
use crate::state::AppState;

/// Active toasts. Expired ones are swept first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Toast>> {
    let mut session = state.session().lock().await;
    session.notifier.sweep(Utc::now());
    Json(session.notifier.active().to_vec())
}

/// Dismiss a toast before it expires.
#[instrument(skip(state))]
pub async fn dismiss(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let mut session = state.session().lock().await;
    if session.notifier.dismiss(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("toast {id}")))
    }
}
