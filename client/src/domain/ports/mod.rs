//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Stores depend only on these traits; the reqwest transport, cap-std file
//! adapters and the in-process notification relay plug in from the outside.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod file_sink;
mod notifier;
mod token_storage;
mod transport;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{AuthError, Authenticator, FIXTURE_TOKEN, FixtureAuthenticator};
#[cfg(test)]
pub use file_sink::MockFileSink;
pub use file_sink::{FileSink, FileSinkError, validate_file_name};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NoticeDraft, NoticeId, NoticeKind, Notifier};
#[cfg(test)]
pub use token_storage::MockTokenStorage;
pub use token_storage::{InMemoryTokenStorage, TokenStorage, TokenStorageError};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{
    ApiRequest, ApiResponse, HttpMethod, RequestBody, ResponseBody, ResponseFormat, Transport,
    TransportError,
};
