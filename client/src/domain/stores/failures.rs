//! Failure logs, archive handling and alert dispatch.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{EntityId, Failure, Resource, ResourceStore, SyncSlot};
use crate::domain::{FailureDraft, FailureLog, StoreError};

/// `failures/logs/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Failures;

impl Resource for Failures {
    type Entity = FailureLog;
    type Draft = FailureDraft;
    const PATH: &'static str = "failures/logs/";
    const NOUN: &'static str = "failure log";
    const PLURAL: &'static str = "failure logs";
    const TITLE: &'static str = "Failure log";
}

const ARCHIVED_PATH: &str = "failures/logs/archived/";

/// Active failure logs, the archive, and per-entry actions.
///
/// Dereferences to the active [`ResourceStore`]; archive actions share its
/// busy flag and last error.
pub struct FailureStore<T: ?Sized, N: ?Sized> {
    logs: ResourceStore<Failures, T, N>,
    archived: SyncSlot<Vec<FailureLog>>,
}

impl<T: ?Sized, N: ?Sized> FailureStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            logs: ResourceStore::new(transport, notifier),
            archived: SyncSlot::new(Vec::new()),
        }
    }

    /// Archived logs from the latest [`Self::fetch_archived`].
    pub fn archived(&self) -> Vec<FailureLog> {
        self.archived.get()
    }
}

impl<T, N> FailureStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Replace the archived collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch archived failures.`.
    pub async fn fetch_archived(&self) -> Result<Vec<FailureLog>, StoreError> {
        self.logs
            .core()
            .load_list(
                self.logs.activity(),
                &self.archived,
                ApiRequest::get(ARCHIVED_PATH),
                Failure::fixed("Failed to fetch archived failures."),
            )
            .await
    }

    /// Move a log to the archive with a reason, then refetch active logs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's explanation, or
    /// `Failed to archive failure log.`.
    pub async fn archive(&self, id: EntityId, reason: &str) -> Result<(), StoreError> {
        let _busy = self.logs.activity().begin();
        self.logs
            .core()
            .send(
                self.logs.activity(),
                ApiRequest::post(action_path(id, "archive"), json!({ "reason": reason })),
                Failure::detailed("Failed to archive failure log."),
            )
            .await?;
        self.logs
            .core()
            .notify(NoticeDraft::success("Success", "Failure log archived."));
        self.logs.resync().await;
        Ok(())
    }

    /// Send the alert for a log to the given Telegram group keys.
    ///
    /// Success is not announced; the caller decides how to confirm it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the server's `error` text, or
    /// `Failed to send notification.`.
    pub async fn notify(&self, id: EntityId, groups: &[String]) -> Result<(), StoreError> {
        let _busy = self.logs.activity().begin();
        self.logs
            .core()
            .send(
                self.logs.activity(),
                ApiRequest::post(action_path(id, "notify"), json!({ "groups": groups })),
                Failure::detailed("Failed to send notification."),
            )
            .await?;
        Ok(())
    }

    /// Delete an archived log for good, then refetch the archive.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's explanation, or
    /// `Failed to delete failure log.`.
    pub async fn permanently_delete(&self, id: EntityId) -> Result<(), StoreError> {
        let _busy = self.logs.activity().begin();
        self.logs
            .core()
            .send(
                self.logs.activity(),
                ApiRequest::delete(action_path(id, "permanent-delete")),
                Failure::detailed("Failed to delete failure log."),
            )
            .await?;
        self.logs.core().notify(NoticeDraft::success(
            "Success",
            "Failure log permanently deleted.",
        ));
        if let Err(error) = self.fetch_archived().await {
            debug!(message = error.message(), "archive refetch failed");
        }
        Ok(())
    }
}

impl<T: ?Sized, N: ?Sized> Deref for FailureStore<T, N> {
    type Target = ResourceStore<Failures, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.logs
    }
}

fn action_path(id: EntityId, action: &str) -> String {
    format!("{}{action}/", Failures::entity_path(id))
}
