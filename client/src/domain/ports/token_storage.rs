//! Driven port for remembering the signed-in session between runs.

use std::sync::{Mutex, PoisonError};

use super::define_port_error;
use crate::domain::StoredSession;

define_port_error! {
    /// Errors raised by session storage adapters.
    pub enum TokenStorageError {
        /// Reading or writing the backing store failed.
        Io { message: String } =>
            "session storage I/O failed: {message}",
        /// Stored data could not be decoded.
        Corrupt { message: String } =>
            "stored session is unreadable: {message}",
    }
}

/// Port for persisting the bearer token and user.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStorage: Send + Sync {
    /// Load the remembered session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStorageError`] when the store cannot be read.
    fn load(&self) -> Result<Option<StoredSession>, TokenStorageError>;

    /// Remember `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStorageError`] when the store cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), TokenStorageError>;

    /// Forget the remembered session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStorageError`] when the store cannot be written.
    fn clear(&self) -> Result<(), TokenStorageError>;
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    session: Mutex<Option<StoredSession>>,
}

impl InMemoryTokenStorage {
    /// Storage pre-seeded with `session`.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn load(&self) -> Result<Option<StoredSession>, TokenStorageError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), TokenStorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
