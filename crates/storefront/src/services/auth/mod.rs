//! Mock authentication.
//!
//! There is no credential store: any well-formed email logs in. The service
//! only validates input and waits a configurable latency, while
//! [`AuthSession`] holds and persists whoever is signed in.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::time::Duration;

use quickcart_core::{Email, UserId};

use crate::models::User;
use crate::storage::{KeyValueStore, StorageError, keys, load_snapshot_or_default, save_snapshot};

/// Minimum password length at signup.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Id given to every password login.
const LOGIN_USER_ID: &str = "user-1";

/// Value of the `isAuthenticated` key while signed in.
const AUTHENTICATED_FLAG: &str = "true";

/// Validates credentials and simulates the round trip to an auth backend.
#[derive(Debug, Clone, Copy)]
pub struct AuthService {
    latency: Duration,
}

impl AuthService {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Log in with email and password.
    ///
    /// The password is not checked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        tokio::time::sleep(self.latency).await;

        Ok(User {
            id: UserId::new(LOGIN_USER_ID),
            name: email.local_part().to_owned(),
            email,
            phone: None,
        })
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// `AuthError::MissingName` for a blank name and
    /// `AuthError::WeakPassword` if the password is too short.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        validate_password(password)?;

        tokio::time::sleep(self.latency).await;

        Ok(User {
            id: UserId::new(format!("user-{}", chrono::Utc::now().timestamp_millis())),
            name: name.to_owned(),
            email,
            phone: None,
        })
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// The signed-in user, if any.
pub struct AuthSession {
    user: Option<User>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Restore the user. Both the profile and an `isAuthenticated` flag of
    /// `"true"` must be present; anything else starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let flagged = store.get(keys::IS_AUTHENTICATED)?.as_deref() == Some(AUTHENTICATED_FLAG);
        let user: Option<User> = load_snapshot_or_default(store.as_ref(), keys::USER)?;
        let user = user.filter(|_| flagged);

        Ok(Self { user, store })
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Make `user` the signed-in user and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    pub fn sign_in(&mut self, user: User) -> Result<&User, StorageError> {
        save_snapshot(self.store.as_ref(), keys::USER, &user)?;
        self.store.set(keys::IS_AUTHENTICATED, AUTHENTICATED_FLAG)?;
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(self.user.insert(user))
    }

    /// Clear the user and the flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the keys cannot be removed.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "User signed out");
        }
        self.store.remove(keys::USER)?;
        self.store.remove(keys::IS_AUTHENTICATED)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_login_derives_name_from_email() {
        let user = service().login("asha@example.in", "anything").await.unwrap();
        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.name, "asha");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email() {
        let err = service().login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_signup_password_length() {
        let err = service()
            .signup("Asha", "asha@example.in", "12345")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));

        let user = service()
            .signup("Asha", "asha@example.in", "123456")
            .await
            .unwrap();
        assert!(user.id.as_str().starts_with("user-"));
        assert_eq!(user.name, "Asha");
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let service = AuthService::new(Duration::from_millis(800));
        let start = tokio::time::Instant::now();
        service.login("asha@example.in", "pw").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_session_persists_and_restores() {
        let store = Arc::new(MemoryStore::new());
        let mut session = AuthSession::load(store.clone()).unwrap();
        assert!(!session.is_authenticated());

        let user = service().login("asha@example.in", "pw").await.unwrap();
        session.sign_in(user).unwrap();
        assert_eq!(store.get(keys::IS_AUTHENTICATED).unwrap().as_deref(), Some("true"));

        let restored = AuthSession::load(store.clone()).unwrap();
        assert_eq!(restored.user().unwrap().name, "asha");

        session.sign_out().unwrap();
        assert!(!AuthSession::load(store).unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_user_without_flag_is_signed_out() {
        let store = Arc::new(MemoryStore::new());
        let user = service().login("asha@example.in", "pw").await.unwrap();
        save_snapshot(store.as_ref(), keys::USER, &user).unwrap();
        store.set(keys::IS_AUTHENTICATED, "false").unwrap();

        assert!(!AuthSession::load(store).unwrap().is_authenticated());
    }
}
