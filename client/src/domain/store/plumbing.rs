//! Request plumbing shared by every store.

use std::sync::Arc;

use pagination::ListEnvelope;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::activity::Activity;
use super::slot::SyncSlot;
use crate::domain::StoreError;
use crate::domain::ports::{
    ApiRequest, ApiResponse, NoticeDraft, Notifier, ResponseBody, Transport, TransportError,
};

const ERROR_TITLE: &str = "Error";

/// How a failed request is described to the user.
#[derive(Debug, Clone, Copy)]
pub struct Failure<'a> {
    /// Notice title.
    pub title: &'a str,
    /// Message used when the server gives no usable explanation.
    pub fallback: &'a str,
    /// Prefer the server's error body over `fallback`.
    pub detailed: bool,
}

impl<'a> Failure<'a> {
    /// Always report `fallback`.
    pub const fn fixed(fallback: &'a str) -> Self {
        Self {
            title: ERROR_TITLE,
            fallback,
            detailed: false,
        }
    }

    /// Report the server's explanation when it has one.
    pub const fn detailed(fallback: &'a str) -> Self {
        Self {
            title: ERROR_TITLE,
            fallback,
            detailed: true,
        }
    }

    /// Override the notice title.
    #[must_use]
    pub const fn titled(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }
}

/// Transport and notifier handles plus the load/mutate discipline.
pub struct StoreCore<T: ?Sized, N: ?Sized> {
    transport: Arc<T>,
    notifier: Arc<N>,
}

impl<T: ?Sized, N: ?Sized> Clone for StoreCore<T, N> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<T: ?Sized, N: ?Sized> StoreCore<T, N> {
    /// Bundle the injected dependencies.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            transport,
            notifier,
        }
    }
}

impl<T, N> StoreCore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Enqueue a notice.
    pub fn notify(&self, notice: NoticeDraft) {
        self.notifier.push(notice);
    }

    /// Record `error` on `activity` and enqueue an error notice.
    pub fn fail(&self, activity: &Activity, error: &StoreError, title: &str) {
        warn!(kind = ?error.kind(), message = error.message(), "store action failed");
        activity.record_error(error.message());
        self.notifier.push(NoticeDraft::error(title, error.message()));
    }

    /// Fetch into `slot` with the busy/error discipline.
    ///
    /// The response is decoded with `decode`. Stale outcomes (a newer
    /// request was dispatched for the same slot) are returned to the caller
    /// but leave the slot, `last_error` and the notice queue untouched.
    pub async fn load<V, F>(
        &self,
        activity: &Activity,
        slot: &SyncSlot<V>,
        request: ApiRequest,
        failure: Failure<'_>,
        decode: F,
    ) -> Result<V, StoreError>
    where
        V: Clone,
        F: FnOnce(ApiResponse) -> Result<V, StoreError>,
    {
        let _busy = activity.begin();
        let ticket = slot.dispatch();
        let path = request.path.clone();
        debug!(method = %request.method, path = %path, ?ticket, "dispatching load");

        let outcome = match self.transport.send(request).await {
            Ok(response) => decode(response),
            Err(error) => Err(describe(&error, failure)),
        };

        match outcome {
            Ok(value) => {
                if !slot.settle(ticket, value.clone()) {
                    debug!(path = %path, ?ticket, "discarding stale response");
                }
                Ok(value)
            }
            Err(error) => {
                if slot.is_current(ticket) {
                    self.fail(activity, &error, failure.title);
                } else {
                    debug!(path = %path, ?ticket, "discarding stale failure");
                }
                Err(error)
            }
        }
    }

    /// Fetch a list, accepting both bare arrays and `{count, results}`.
    pub async fn load_list<E>(
        &self,
        activity: &Activity,
        slot: &SyncSlot<Vec<E>>,
        request: ApiRequest,
        failure: Failure<'_>,
    ) -> Result<Vec<E>, StoreError>
    where
        E: DeserializeOwned + Clone,
    {
        self.load(activity, slot, request, failure, |response| {
            decode_list(response, failure.fallback)
        })
        .await
    }

    /// Send a request that does not feed a slot.
    ///
    /// Failures are recorded on `activity` and surfaced as an error notice.
    /// The caller owns the busy guard so it can span follow-up refetches.
    pub async fn send(
        &self,
        activity: &Activity,
        request: ApiRequest,
        failure: Failure<'_>,
    ) -> Result<ApiResponse, StoreError> {
        debug!(method = %request.method, path = %request.path, "dispatching request");
        match self.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                let error = describe(&error, failure);
                self.fail(activity, &error, failure.title);
                Err(error)
            }
        }
    }

    /// Send without touching state; the caller interprets every outcome.
    pub async fn send_raw(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        debug!(method = %request.method, path = %request.path, "dispatching request");
        self.transport.send(request).await
    }
}

fn describe(error: &TransportError, failure: Failure<'_>) -> StoreError {
    if failure.detailed {
        StoreError::detailed(error, failure.fallback)
    } else {
        StoreError::fixed(error, failure.fallback)
    }
}

/// Decode a list response in either envelope.
pub fn decode_list<E: DeserializeOwned>(
    response: ApiResponse,
    fallback: &str,
) -> Result<Vec<E>, StoreError> {
    serde_json::from_value::<ListEnvelope<E>>(response.into_json())
        .map(ListEnvelope::into_items)
        .map_err(|error| {
            debug!(%error, "list response did not decode");
            StoreError::decode(fallback)
        })
}

/// Decode a single entity.
pub fn decode_entity<E: DeserializeOwned>(
    response: ApiResponse,
    fallback: &str,
) -> Result<E, StoreError> {
    serde_json::from_value(response.into_json()).map_err(|error| {
        debug!(%error, "entity response did not decode");
        StoreError::decode(fallback)
    })
}

/// Decode a mutation echo; bodies that are not the entity yield `None`.
pub fn decode_echo<E: DeserializeOwned>(response: ApiResponse) -> Option<E> {
    serde_json::from_value(response.into_json())
        .map_err(|error| debug!(%error, "mutation response is not an entity"))
        .ok()
}

/// The `message` string of an action response such as
/// `{"message": "Test email sent successfully to ops@example.com."}`.
pub fn response_message(response: &ApiResponse) -> Option<String> {
    match &response.body {
        ResponseBody::Json(value) => value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_owned),
        ResponseBody::Empty | ResponseBody::Binary(_) => None,
    }
}
