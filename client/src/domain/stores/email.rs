//! SMTP settings singleton.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{
    Activity, Failure, StoreCore, SyncSlot, decode_entity, response_message,
};
use crate::domain::{EmailSettings, EmailSettingsDraft, StoreError};

const SETTINGS_PATH: &str = "settings/email/";
const TEST_PATH: &str = "settings/email/test/";
const FETCH_FAILED: &str = "Failed to fetch email settings.";

/// Holds the server's SMTP settings.
pub struct EmailSettingsStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    settings: SyncSlot<Option<EmailSettings>>,
}

impl<T: ?Sized, N: ?Sized> EmailSettingsStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            settings: SyncSlot::new(None),
        }
    }

    /// Settings from the latest response.
    pub fn settings(&self) -> Option<EmailSettings> {
        self.settings.get()
    }

    /// Whether an action is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }
}

impl<T, N> EmailSettingsStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load the settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch email settings.`.
    pub async fn fetch(&self) -> Result<EmailSettings, StoreError> {
        let loaded = self
            .core
            .load(
                &self.activity,
                &self.settings,
                ApiRequest::get(SETTINGS_PATH),
                Failure::fixed(FETCH_FAILED),
                |response| decode_entity(response, FETCH_FAILED).map(Some),
            )
            .await?;
        loaded.ok_or_else(|| StoreError::decode(FETCH_FAILED))
    }

    /// Replace the settings, then reload them.
    ///
    /// An empty password in `draft` keeps the stored one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary, or
    /// `Failed to save email settings.`.
    pub async fn save(&self, draft: &EmailSettingsDraft) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        let fallback = "Failed to save email settings.";
        let body = serde_json::to_value(draft).map_err(|error| {
            debug!(%error, "email settings did not serialise");
            let store_error = StoreError::decode(fallback);
            self.core.fail(&self.activity, &store_error, "Error");
            store_error
        })?;
        self.core
            .send(
                &self.activity,
                ApiRequest::put(SETTINGS_PATH, body),
                Failure::detailed(fallback),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Success", "Email settings saved."));
        if let Err(error) = self.fetch().await {
            debug!(message = error.message(), "refetch after save failed");
        }
        Ok(())
    }

    /// Send a test email using the saved settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the server's explanation (missing
    /// configuration, SMTP authentication failures), or
    /// `Failed to send test email.`.
    pub async fn send_test(&self, to_email: &str) -> Result<String, StoreError> {
        let _busy = self.activity.begin();
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::post(TEST_PATH, json!({ "to_email": to_email.trim() })),
                Failure::detailed("Failed to send test email."),
            )
            .await?;
        let message = response_message(&response)
            .unwrap_or_else(|| format!("Test email sent to {}.", to_email.trim()));
        self.core
            .notify(NoticeDraft::success("Success", message.as_str()));
        Ok(message)
    }
}
