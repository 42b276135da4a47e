//! Application user accounts.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A user account. Passwords are write-only and never returned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Given name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// Role key, e.g. `admin` or `viewer`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    /// Job title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub designation: String,
    /// Phone number.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    /// Whether the account may sign in.
    #[serde(default)]
    pub is_active: bool,
}

/// Create/update payload for [`User`].
///
/// An empty password is omitted so updates keep the current one.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserDraft {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role key.
    pub role: String,
    /// Job title.
    pub designation: String,
    /// Phone number.
    pub phone_number: String,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// New password; empty keeps the existing one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl std::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDraft")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("password", &(!self.password.is_empty()).then_some("<redacted>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_password_is_not_sent() {
        let draft = UserDraft {
            username: "ops".to_owned(),
            role: "viewer".to_owned(),
            ..UserDraft::default()
        };
        let body = serde_json::to_value(&draft).expect("serialises");
        assert!(body.get("password").is_none());

        let with_password = UserDraft {
            password: "s3cret".to_owned(),
            ..draft
        };
        let body = serde_json::to_value(&with_password).expect("serialises");
        assert_eq!(body["password"], json!("s3cret"));
    }
}
