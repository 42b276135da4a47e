//! Failure identifier format singleton.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{ApiRequest, ApiResponse, NoticeDraft, Notifier, Transport};
use crate::domain::store::{Activity, Failure, StoreCore, SyncSlot, decode_entity};
use crate::domain::{FailureIdSettings, FailureIdSettingsDraft, StoreError};

const SETTINGS_PATH: &str = "core/failure-id-settings/";
// The server keeps the singleton at primary key 1.
const SINGLETON_PATH: &str = "core/failure-id-settings/1/";
const FETCH_FAILED: &str = "Could not load Failure ID settings.";
const SAVE_FAILED: &str = "Could not save Failure ID settings.";

/// Holds the failure id format; starts from the stock `RF`/4/yearly format.
pub struct FailureIdSettingsStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    settings: SyncSlot<FailureIdSettings>,
}

impl<T: ?Sized, N: ?Sized> FailureIdSettingsStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            settings: SyncSlot::new(FailureIdSettings::default()),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> FailureIdSettings {
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

impl<T, N> FailureIdSettingsStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load the settings.
    ///
    /// The endpoint answers with the object itself or with a router page;
    /// an empty page keeps the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Could not load Failure ID settings.`.
    pub async fn fetch(&self) -> Result<FailureIdSettings, StoreError> {
        let current = self.settings();
        self.core
            .load(
                &self.activity,
                &self.settings,
                ApiRequest::get(SETTINGS_PATH),
                Failure::fixed(FETCH_FAILED),
                |response| decode_settings(response, current),
            )
            .await
    }

    /// Update the settings and adopt the server's echo.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary, or
    /// `Could not save Failure ID settings.`.
    pub async fn save(
        &self,
        draft: &FailureIdSettingsDraft,
    ) -> Result<FailureIdSettings, StoreError> {
        let body = serde_json::to_value(draft).map_err(|error| {
            debug!(%error, "failure id settings did not serialise");
            let store_error = StoreError::decode(SAVE_FAILED);
            self.core.fail(&self.activity, &store_error, "Error");
            store_error
        })?;
        let saved = self
            .core
            .load(
                &self.activity,
                &self.settings,
                ApiRequest::patch(SINGLETON_PATH, body),
                Failure::detailed(SAVE_FAILED),
                |response| decode_entity(response, SAVE_FAILED),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Success", "Failure ID settings saved."));
        Ok(saved)
    }
}

fn decode_settings(
    response: ApiResponse,
    current: FailureIdSettings,
) -> Result<FailureIdSettings, StoreError> {
    let body = response.into_json();
    let single = match body.get("results") {
        Some(Value::Array(results)) => match results.first() {
            Some(first) => first.clone(),
            None => return Ok(current),
        },
        _ => body,
    };
    serde_json::from_value(single).map_err(|error| {
        debug!(%error, "failure id settings did not decode");
        StoreError::decode(FETCH_FAILED)
    })
}
