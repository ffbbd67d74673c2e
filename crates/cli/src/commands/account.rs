//! Mock account commands.
//!
//! These write the same `user` and `isAuthenticated` snapshots the storefront
//! reads, so a login here is visible to the server and to `recurring`.

use std::sync::Arc;
use std::time::Duration;

use quickcart_storefront::services::{AuthService, AuthSession};

use super::{CliError, Context};

/// Log in with any password.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` for a malformed email, or a storage
/// error.
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let user = AuthService::new(Duration::ZERO)
        .login(email, password)
        .await?;

    let mut session = AuthSession::load(Arc::clone(&ctx.store))?;
    let user = session.sign_in(user)?;
    tracing::info!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

/// Sign out. Succeeds when already signed out.
///
/// # Errors
///
/// Returns a storage error if the snapshots cannot be removed.
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    AuthSession::load(Arc::clone(&ctx.store))?.sign_out()?;
    tracing::info!("Signed out");
    Ok(())
}

/// Print the signed-in user.
///
/// # Errors
///
/// Returns a storage error if the snapshots cannot be read.
pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let session = AuthSession::load(Arc::clone(&ctx.store))?;
    match session.user() {
        Some(user) => tracing::info!("{} <{}> ({})", user.name, user.email, user.id),
        None => tracing::info!("Not signed in"),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_then_logout() {
        let ctx = Context::in_memory();

        login(&ctx, "jane@example.com", "anything").await.unwrap();
        let session = AuthSession::load(Arc::clone(&ctx.store)).unwrap();
        assert_eq!(session.user().unwrap().name, "jane");

        logout(&ctx).unwrap();
        assert!(!AuthSession::load(Arc::clone(&ctx.store)).unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email() {
        let ctx = Context::in_memory();
        assert!(matches!(
            login(&ctx, "not-an-email", "x").await,
            Err(CliError::Auth(_))
        ));
    }
}
