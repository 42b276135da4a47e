//! Signed-in session.
//!
//! The session is remembered through [`TokenStorage`] and broadcast on a
//! watch channel so transports can attach the bearer token without
//! depending on this store.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::ports::{
    AuthError, Authenticator, NoticeDraft, Notifier, TokenStorage, TokenStorageError,
};
use crate::domain::store::Activity;
use crate::domain::{
    Credentials, SessionUser, StoreError, StoreErrorKind, StoredSession,
};

const SIGN_IN_REQUIRED: &str = "Sign in to continue.";

/// Authentication state plus login and logout.
pub struct AuthStore<A: ?Sized, S: ?Sized, N: ?Sized> {
    authenticator: Arc<A>,
    storage: Arc<S>,
    notifier: Arc<N>,
    activity: Activity,
    session: Mutex<Option<StoredSession>>,
    token_tx: watch::Sender<Option<String>>,
}

impl<A: ?Sized, S: ?Sized, N: ?Sized> AuthStore<A, S, N> {
    /// Create a signed-out store.
    pub fn new(authenticator: Arc<A>, storage: Arc<S>, notifier: Arc<N>) -> Self {
        let (token_tx, _) = watch::channel(None);
        Self {
            authenticator,
            storage,
            notifier,
            activity: Activity::default(),
            session: Mutex::new(None),
            token_tx,
        }
    }

    /// Receiver tracking the current bearer token.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<StoredSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Signed-in user.
    pub fn user(&self) -> Option<SessionUser> {
        self.session().map(|session| session.user)
    }

    /// Whether login or restore is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }

    /// Gate for protected actions.
    ///
    /// # Errors
    ///
    /// Returns an [`StoreErrorKind::Unauthorized`] error when signed out.
    pub fn require_session(&self) -> Result<StoredSession, StoreError> {
        self.session()
            .ok_or_else(|| StoreError::unauthorized(SIGN_IN_REQUIRED))
    }

    fn replace(&self, session: Option<StoredSession>) {
        let token = session.as_ref().map(|session| session.token.clone());
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
        self.token_tx.send_replace(token);
    }
}

impl<A, S, N> AuthStore<A, S, N>
where
    A: Authenticator + ?Sized,
    S: TokenStorage + ?Sized,
    N: Notifier + ?Sized,
{
    /// Restore a remembered session.
    ///
    /// Unreadable stored data is discarded and the store stays signed out.
    ///
    /// # Errors
    ///
    /// Returns a storage [`StoreError`] when the backing store cannot be read.
    pub fn init_from_storage(&self) -> Result<Option<StoredSession>, StoreError> {
        let _busy = self.activity.begin();
        match self.storage.load() {
            Ok(session) => {
                self.replace(session.clone());
                Ok(session)
            }
            Err(error @ TokenStorageError::Corrupt { .. }) => {
                warn!(%error, "discarding unreadable session");
                if let Err(clear_error) = self.storage.clear() {
                    warn!(error = %clear_error, "failed to clear unreadable session");
                }
                self.replace(None);
                Ok(None)
            }
            Err(error) => Err(self.fail(StoreError::from(error), "Error")),
        }
    }

    /// Exchange credentials for a token and remember the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::Unauthorized`] when the credentials are
    /// refused, [`StoreErrorKind::Network`] when the authenticator is
    /// unreachable and a storage error when the session cannot be saved.
    pub async fn login(&self, credentials: &Credentials) -> Result<StoredSession, StoreError> {
        let _busy = self.activity.begin();
        let token = self
            .authenticator
            .authenticate(credentials)
            .await
            .map_err(|error| self.fail(auth_failure(&error), "Login Failed"))?;
        let session = StoredSession {
            token,
            user: SessionUser {
                username: credentials.username().to_owned(),
            },
        };
        self.storage
            .save(&session)
            .map_err(|error| self.fail(StoreError::from(error), "Login Failed"))?;
        self.replace(Some(session.clone()));
        info!(username = credentials.username(), "signed in");
        self.notifier.push(NoticeDraft::success(
            "Welcome",
            format!("Signed in as {}.", credentials.username()),
        ));
        Ok(session)
    }

    /// Forget the session locally and in storage.
    ///
    /// # Errors
    ///
    /// Returns a storage [`StoreError`] when the stored session cannot be
    /// removed; the in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        self.replace(None);
        self.storage
            .clear()
            .map_err(|error| self.fail(StoreError::from(error), "Error"))?;
        self.notifier
            .push(NoticeDraft::info("Signed out", "You have been signed out."));
        Ok(())
    }

    fn fail(&self, error: StoreError, title: &str) -> StoreError {
        warn!(kind = ?error.kind(), message = error.message(), "auth action failed");
        self.activity.record_error(error.message());
        self.notifier.push(NoticeDraft::error(title, error.message()));
        error
    }
}

fn auth_failure(error: &AuthError) -> StoreError {
    match error {
        AuthError::Rejected { message } => {
            let message = if message.trim().is_empty() {
                "Invalid username or password."
            } else {
                message.as_str()
            };
            StoreError::unauthorized(message)
        }
        AuthError::Unavailable { .. } => StoreError::new(
            StoreErrorKind::Network,
            "Authentication service is unavailable.",
        ),
    }
}
