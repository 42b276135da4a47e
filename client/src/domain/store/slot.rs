//! State slots that ignore stale responses.
//!
//! Each dispatch takes a ticket from a monotonic counter. A settling
//! response is written only while its ticket is still the newest one, so a
//! slow request can never overwrite the result of a later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Sequence number handed out by [`SyncSlot::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A value replaced wholesale by server responses.
#[derive(Debug, Default)]
pub struct SyncSlot<T> {
    latest: AtomicU64,
    value: Mutex<T>,
}

impl<T> SyncSlot<T> {
    /// Slot holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            latest: AtomicU64::new(0),
            value: Mutex::new(initial),
        }
    }

    /// Register a new request against this slot.
    pub fn dispatch(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest dispatch.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is still current; returns whether it was
    /// applied.
    pub fn settle(&self, ticket: Ticket, value: T) -> bool {
        let mut guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            return false;
        }
        *guard = value;
        true
    }

    /// Read the value through a closure.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.value.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T: Clone> SyncSlot<T> {
    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_dispatch_wins() {
        let slot = SyncSlot::new(Vec::<u32>::new());
        let first = slot.dispatch();
        let second = slot.dispatch();

        assert!(slot.settle(second, vec![2]));
        assert!(!slot.settle(first, vec![1]), "stale response must be dropped");
        assert_eq!(slot.get(), vec![2]);
    }

    #[test]
    fn settled_ticket_stays_current_until_next_dispatch() {
        let slot = SyncSlot::new(0_u8);
        let ticket = slot.dispatch();
        assert!(slot.settle(ticket, 1));
        assert!(slot.is_current(ticket));
        let _next = slot.dispatch();
        assert!(!slot.is_current(ticket));
    }
}
