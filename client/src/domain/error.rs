//! Store-level error type.
//!
//! Every store action returns [`StoreError`]. Its `message` is the exact
//! text written to the store's `last_error` and to the error notice, so
//! callers never have to re-derive user-facing strings.

use super::error_shape::ErrorShape;
use super::ports::{FileSinkError, TokenStorageError, TransportError};

/// Failure category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// No response arrived.
    Network,
    /// The request timed out.
    Timeout,
    /// The server refused the request with a 4xx status.
    Rejected {
        /// HTTP status.
        status: u16,
        /// Parsed error body.
        shape: ErrorShape,
    },
    /// The server failed with a 5xx (or otherwise unexpected) status.
    Server {
        /// HTTP status.
        status: u16,
    },
    /// The response body did not match the expected type.
    Decode,
    /// Local persistence (exports, session file) failed.
    Storage,
    /// No signed-in session, or credentials were refused.
    Unauthorized,
}

/// Typed failure returned by store actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    /// Build an error from its parts.
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Map a transport failure and always report `fallback` to the user.
    pub fn fixed(error: &TransportError, fallback: &str) -> Self {
        Self::new(kind_of(error), fallback)
    }

    /// Map a transport failure, preferring the server's own explanation.
    ///
    /// Structured error bodies (field errors or a single message) become the
    /// message; anything else falls back to `fallback`.
    ///
    /// # Examples
    /// ```
    /// use rfms_client::domain::StoreError;
    /// use rfms_client::domain::ports::TransportError;
    ///
    /// let error = TransportError::status(400_u16, r#"{"name": ["required"]}"#);
    /// let store_error = StoreError::detailed(&error, "Failed to add circuit.");
    /// assert_eq!(store_error.message(), "name: required");
    /// ```
    pub fn detailed(error: &TransportError, fallback: &str) -> Self {
        let kind = kind_of(error);
        let message = match error {
            TransportError::Status { body, .. } => {
                let shape = match &kind {
                    StoreErrorKind::Rejected { shape, .. } => shape.clone(),
                    _ => ErrorShape::parse(body),
                };
                if shape.is_structured() {
                    shape.summary()
                } else {
                    fallback.to_owned()
                }
            }
            _ => fallback.to_owned(),
        };
        Self::new(kind, message)
    }

    /// A response arrived but could not be decoded.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Decode, message)
    }

    /// Local persistence failed.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    /// No session, or credentials refused.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unauthorized, message)
    }

    /// Failure category.
    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            StoreErrorKind::Rejected { status, .. } | StoreErrorKind::Server { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Parsed error body for 4xx rejections.
    pub fn shape(&self) -> Option<&ErrorShape> {
        match &self.kind {
            StoreErrorKind::Rejected { shape, .. } => Some(shape),
            _ => None,
        }
    }
}

impl From<FileSinkError> for StoreError {
    fn from(error: FileSinkError) -> Self {
        Self::storage(error.to_string())
    }
}

impl From<TokenStorageError> for StoreError {
    fn from(error: TokenStorageError) -> Self {
        Self::storage(error.to_string())
    }
}

fn kind_of(error: &TransportError) -> StoreErrorKind {
    match error {
        TransportError::Network { .. } => StoreErrorKind::Network,
        TransportError::Timeout { .. } => StoreErrorKind::Timeout,
        TransportError::Decode { .. } => StoreErrorKind::Decode,
        TransportError::Status { status, body } if (400..500).contains(status) => {
            StoreErrorKind::Rejected {
                status: *status,
                shape: ErrorShape::parse(body),
            }
        }
        TransportError::Status { status, .. } => StoreErrorKind::Server { status: *status },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::network(TransportError::network("refused"), None)]
    #[case::timeout(TransportError::timeout("35s"), None)]
    #[case::rejected(TransportError::status(400_u16, "{}"), Some(400))]
    #[case::server(TransportError::status(502_u16, "bad gateway"), Some(502))]
    fn fixed_messages_ignore_the_body(#[case] error: TransportError, #[case] status: Option<u16>) {
        let store_error = StoreError::fixed(&error, "Failed to fetch depots.");
        assert_eq!(store_error.message(), "Failed to fetch depots.");
        assert_eq!(store_error.status(), status);
    }

    #[test]
    fn detailed_messages_fall_back_for_unstructured_bodies() {
        let error = TransportError::status(500_u16, "<h1>Server Error</h1>");
        let store_error = StoreError::detailed(&error, "Failed to add depot.");
        assert_eq!(store_error.message(), "Failed to add depot.");
        assert_eq!(store_error.kind(), &StoreErrorKind::Server { status: 500 });
    }

    #[test]
    fn detailed_messages_surface_server_errors_on_5xx() {
        let error = TransportError::status(500_u16, r#"{"error": "Failed to send message: chat not found"}"#);
        let store_error = StoreError::detailed(&error, "Could not send test message.");
        assert_eq!(store_error.message(), "Failed to send message: chat not found");
    }

    #[test]
    fn rejected_errors_keep_their_shape() {
        let error = TransportError::status(400_u16, r#"{"code": ["must be unique"]}"#);
        let store_error = StoreError::detailed(&error, "Failed to add station.");
        let shape = store_error.shape().expect("4xx keeps the parsed shape");
        assert!(shape.field("code").is_some());
    }
}
