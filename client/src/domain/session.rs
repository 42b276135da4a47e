//! Authenticated session primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation failures for [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was empty once trimmed.
    EmptyUsername,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Username and password pair.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; it is never trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// # Examples
    /// ```
    /// use rfms_client::domain::Credentials;
    ///
    /// assert!(Credentials::try_from_parts("ops", "secret").is_ok());
    /// assert!(Credentials::try_from_parts("  ", "secret").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] when either part is empty.
    pub fn try_from_parts(
        username: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsValidationError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        let password = password.into();
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password,
        })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as entered.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in user as remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Login name.
    pub username: String,
}

/// Opaque bearer token plus the user it belongs to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token sent on every request.
    pub token: String,
    /// Signed-in user.
    pub user: SessionUser,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
