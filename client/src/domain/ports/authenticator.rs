//! Driven port for exchanging credentials for a bearer token.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Credentials;

define_port_error! {
    /// Errors raised by authenticators.
    pub enum AuthError {
        /// Credentials were refused.
        Rejected { message: String } =>
            "credentials rejected: {message}",
        /// The authentication backend could not be reached.
        Unavailable { message: String } =>
            "authentication unavailable: {message}",
    }
}

/// Port for authenticating a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Validate credentials and return an opaque bearer token.
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, AuthError>;
}

/// Development authenticator used until the API exposes a login endpoint.
///
/// Any well-formed credentials are accepted and receive the fixed token
/// `dev-token`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthenticator;

/// Token issued by [`FixtureAuthenticator`].
pub const FIXTURE_TOKEN: &str = "dev-token";

#[async_trait]
impl Authenticator for FixtureAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<String, AuthError> {
        Ok(FIXTURE_TOKEN.to_owned())
    }
}
