//! Signed-in shopper profile.

use serde::{Deserialize, Serialize};

use quickcart_core::{Email, UserId};

/// The mock-authenticated user.
///
/// Persisted as-is under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name; the email's local part when logging in.
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_omits_missing_phone() {
        let user = User {
            id: UserId::new("user-1"),
            name: "asha".to_string(),
            email: Email::parse("asha@example.in").unwrap(),
            phone: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "user-1", "name": "asha", "email": "asha@example.in"})
        );
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }
}
