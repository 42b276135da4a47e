//! The ten most recent open failures.

use std::sync::Arc;

use crate::domain::ports::{ApiRequest, Notifier, Transport};
use crate::domain::store::{Activity, Failure, StoreCore, SyncSlot};
use crate::domain::{FailureLog, StoreError};

const RECENT_PATH: &str = "recent-failures/";

/// Read-only feed of recent failures.
pub struct RecentFailuresStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    items: SyncSlot<Vec<FailureLog>>,
}

impl<T: ?Sized, N: ?Sized> RecentFailuresStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            items: SyncSlot::new(Vec::new()),
        }
    }

    /// Items from the latest response, newest first.
    pub fn items(&self) -> Vec<FailureLog> {
        self.items.get()
    }

    /// Whether a fetch is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }
}

impl<T, N> RecentFailuresStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Reload the feed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch recent failures.`.
    pub async fn fetch(&self) -> Result<Vec<FailureLog>, StoreError> {
        self.core
            .load_list(
                &self.activity,
                &self.items,
                ApiRequest::get(RECENT_PATH),
                Failure::fixed("Failed to fetch recent failures."),
            )
            .await
    }
}
