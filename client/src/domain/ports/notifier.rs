//! Driven port for surfacing action outcomes to the user.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Severity class of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// An action completed.
    Success,
    /// An action completed with issues worth reading.
    Warning,
    /// An action failed.
    Error,
}

/// Identifier assigned by the relay; strictly increasing in push order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoticeId(u64);

impl NoticeId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notice as requested by a store, before the relay assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDraft {
    /// Severity class.
    pub kind: NoticeKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Lifetime override; `None` uses the relay default.
    pub ttl: Option<Duration>,
}

impl NoticeDraft {
    /// Build a notice of the given kind.
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            ttl: None,
        }
    }

    /// Informational notice.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    /// Success notice.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, message)
    }

    /// Warning notice.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    /// Error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    /// Override how long the notice stays queued.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Port through which stores enqueue user-facing notices.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Enqueue a notice and return its id.
    fn push(&self, notice: NoticeDraft) -> NoticeId;
}
