//! Telegram notification groups.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::json;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{
    EntityId, Failure, Resource, ResourceStore, response_message,
};
use crate::domain::{StoreError, TelegramGroup, TelegramGroupDraft};

/// `telegram/groups/` collection.
#[derive(Debug, Clone, Copy)]
pub struct TelegramGroups;

impl Resource for TelegramGroups {
    type Entity = TelegramGroup;
    type Draft = TelegramGroupDraft;
    const PATH: &'static str = "telegram/groups/";
    const NOUN: &'static str = "Telegram group";
    const PLURAL: &'static str = "Telegram groups";
    const TITLE: &'static str = "Telegram group";
}

/// Telegram groups plus test delivery.
pub struct TelegramStore<T: ?Sized, N: ?Sized> {
    groups: ResourceStore<TelegramGroups, T, N>,
}

impl<T: ?Sized, N: ?Sized> TelegramStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            groups: ResourceStore::new(transport, notifier),
        }
    }
}

impl<T, N> TelegramStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Ask the server to post a test message to a group.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the server's explanation (for example a
    /// missing chat id), or `Failed to send test message.`.
    pub async fn send_test_message(&self, id: EntityId) -> Result<String, StoreError> {
        let _busy = self.groups.activity().begin();
        let path = format!("{}send-test-message/", TelegramGroups::entity_path(id));
        let response = self
            .groups
            .core()
            .send(
                self.groups.activity(),
                ApiRequest::post(path, json!({})),
                Failure::detailed("Failed to send test message."),
            )
            .await?;
        let message =
            response_message(&response).unwrap_or_else(|| "Test message sent.".to_owned());
        self.groups
            .core()
            .notify(NoticeDraft::success("Success", message.as_str()));
        Ok(message)
    }
}

impl<T: ?Sized, N: ?Sized> Deref for TelegramStore<T, N> {
    type Target = ResourceStore<TelegramGroups, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.groups
    }
}
