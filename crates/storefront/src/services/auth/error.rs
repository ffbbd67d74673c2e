//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during mock authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] quickcart_core::EmailError),

    /// Password too short.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Display name missing at signup.
    #[error("name is required")]
    MissingName,
}
