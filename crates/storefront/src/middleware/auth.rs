//! Authentication extractor.
//!
//! Recurring orders are only available to a signed-in shopper.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// Rejects with `401 Unauthorized` when nobody is signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> String {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session().lock().await;
        session
            .auth
            .user()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Please log in to continue".to_string()))
    }
}
