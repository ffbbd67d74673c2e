//! Recurring order handlers. All require a signed-in user.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::recurring::{RecurringDraft, RecurringItem};
use crate::state::AppState;

/// A recurring item with its product resolved.
#[derive(Debug, Serialize)]
pub struct RecurringItemView {
    #[serde(flatten)]
    pub item: RecurringItem,
    pub product: Option<Product>,
}

/// List the user's recurring items.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Json<Vec<RecurringItemView>> {
    let session = state.session().lock().await;
    let items = session
        .recurring
        .owned_by(&user.id)
        .map(|item| RecurringItemView {
            product: state.catalog().product(item.product_id.as_str()).cloned(),
            item: item.clone(),
        })
        .collect();
    Json(items)
}

/// Add a recurring item.
#[instrument(skip(state, user))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(draft): Json<RecurringDraft>,
) -> Result<(StatusCode, Json<RecurringItem>)> {
    let mut session = state.session().lock().await;
    let item = match session.recurring.add(&user.id, draft, state.catalog()) {
        Ok(item) => item,
        Err(err) => {
            session
                .notifier
                .error("Could not add recurring item", Some(err.to_string()));
            return Err(err.into());
        }
    };
    session.notifier.success(
        "Recurring order added",
        Some(format!("Delivered {} at {}", item.frequency, item.delivery_time)),
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// Delete one of the user's recurring items.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let mut session = state.session().lock().await;
    session.recurring.delete(&user.id, &id)?;
    session.notifier.success("Recurring order removed", None);
    Ok(StatusCode::NO_CONTENT)
}
