//! In-process notification relay.
//!
//! The relay is an ordered, process-wide queue of notices. Each push
//! schedules its own removal on the Tokio runtime; removal is by id, so a
//! timer firing after `remove` or `clear` is a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use super::ports::{NoticeDraft, NoticeId, NoticeKind, Notifier};

/// Lifetime applied when a notice does not request its own.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(4_000);

/// A queued notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Relay-assigned id.
    pub id: NoticeId,
    /// Severity class.
    pub kind: NoticeKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Time until automatic removal.
    pub ttl: Duration,
}

#[derive(Debug, Default)]
struct RelayState {
    next_id: u64,
    notices: Vec<Notice>,
}

/// Shared notice queue with automatic expiry.
///
/// Cloning yields another handle to the same queue.
///
/// # Examples
/// ```
/// use rfms_client::domain::NotificationRelay;
/// use rfms_client::domain::ports::NoticeDraft;
///
/// let relay = NotificationRelay::new();
/// let first = relay.push(NoticeDraft::info("Hello", "first"));
/// let second = relay.push(NoticeDraft::info("Hello", "second"));
/// assert!(first < second);
/// relay.clear();
/// assert!(relay.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct NotificationRelay {
    state: Arc<Mutex<RelayState>>,
    default_ttl: Duration,
}

impl Default for NotificationRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationRelay {
    /// Relay using [`DEFAULT_NOTICE_TTL`].
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_NOTICE_TTL)
    }

    /// Relay with a custom default lifetime.
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RelayState::default())),
            default_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a notice and schedule its removal.
    ///
    /// Outside a Tokio runtime the notice stays queued until removed or
    /// cleared.
    pub fn push(&self, draft: NoticeDraft) -> NoticeId {
        let ttl = draft.ttl.unwrap_or(self.default_ttl);
        let id = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = NoticeId::new(state.next_id);
            state.notices.push(Notice {
                id,
                kind: draft.kind,
                title: draft.title,
                message: draft.message,
                ttl,
            });
            id
        };
        self.schedule_expiry(id, ttl);
        id
    }

    fn schedule_expiry(&self, id: NoticeId, ttl: Duration) {
        let Ok(handle) = Handle::try_current() else {
            debug!(notice_id = %id, "no runtime available; notice will not expire");
            return;
        };
        let state = Arc::downgrade(&self.state);
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            expire(&state, id);
        });
    }

    /// Remove a notice; returns whether it was still queued.
    pub fn remove(&self, id: NoticeId) -> bool {
        remove_from(&mut self.lock(), id)
    }

    /// Drop every queued notice. Pending timers become no-ops.
    pub fn clear(&self) {
        self.lock().notices.clear();
    }

    /// Snapshot of the queue in push order.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Take every queued notice, leaving the queue empty.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.lock().notices.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().notices.is_empty()
    }
}

impl Notifier for NotificationRelay {
    fn push(&self, notice: NoticeDraft) -> NoticeId {
        NotificationRelay::push(self, notice)
    }
}

fn expire(state: &Weak<Mutex<RelayState>>, id: NoticeId) {
    if let Some(state) = state.upgrade() {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        if remove_from(&mut guard, id) {
            debug!(notice_id = %id, "notice expired");
        }
    }
}

fn remove_from(state: &mut RelayState, id: NoticeId) -> bool {
    let before = state.notices.len();
    state.notices.retain(|notice| notice.id != id);
    state.notices.len() != before
}
