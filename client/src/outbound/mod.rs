//! Outbound adapters implementing the domain ports.
//!
//! - **http**: reqwest transport against the REST API
//! - **files**: cap-std backed export sink and session storage
//!
//! Adapters translate between port types and the outside world; they hold
//! no store state.

pub mod files;
pub mod http;

pub use files::{DirectoryFileSink, FileTokenStorage};
pub use http::{HttpSettings, HttpTransport, HttpTransportBuildError};
