//! Mock login, signup and logout handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Login request.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup request.
#[derive(Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Log in with email and password.
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<User>> {
    let user = match state.auth().login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(err) => {
            state
                .session()
                .lock()
                .await
                .notifier
                .error("Login failed", Some(err.to_string()));
            return Err(err.into());
        }
    };
    sign_in(&state, user, "Welcome back!").await
}

/// Create an account and sign in.
#[instrument(skip(state))]
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<Json<User>> {
    let user = match state
        .auth()
        .signup(&form.name, &form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(err) => {
            state
                .session()
                .lock()
                .await
                .notifier
                .error("Signup failed", Some(err.to_string()));
            return Err(err.into());
        }
    };
    sign_in(&state, user, "Account created!").await
}

async fn sign_in(state: &AppState, user: User, greeting: &str) -> Result<Json<User>> {
    let mut session = state.session().lock().await;
    let user = session.auth.sign_in(user)?.clone();
    set_sentry_user(&user.id, Some(user.email.as_str()));
    session
        .notifier
        .success(greeting, Some(format!("Signed in as {}", user.email)));
    Ok(Json(user))
}

/// Sign out. Succeeds when nobody is signed in.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    let mut session = state.session().lock().await;
    let was_signed_in = session.auth.is_authenticated();
    session.auth.sign_out()?;
    clear_sentry_user();
    if was_signed_in {
        session.notifier.info("Logged out", None);
    }
    Ok(StatusCode::NO_CONTENT)
}
