//! Busy flag and last error shared by every store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Advisory busy state plus the most recent error message.
///
/// `busy` is a counter rather than a boolean: actions may overlap (nothing
/// blocks a second call) and the flag must stay raised until the last one
/// settles.
#[derive(Debug, Default)]
pub struct Activity {
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl Activity {
    /// Mark an action as started and clear the previous error.
    ///
    /// The returned guard lowers the flag when dropped, on every exit path.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.set_last_error(None);
        BusyGuard { activity: self }
    }

    /// Whether any action is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failure since the last `begin`.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a failure message.
    pub fn record_error(&self, message: impl Into<String>) {
        self.set_last_error(Some(message.into()));
    }

    fn set_last_error(&self, value: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Lowers the busy flag on drop.
#[derive(Debug)]
#[must_use = "the store is only busy while the guard is alive"]
pub struct BusyGuard<'a> {
    activity: &'a Activity,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.activity.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
