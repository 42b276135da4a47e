//! Transport doubles shared by the store integration tests.
//!
//! `ScriptedTransport` answers from per-route queues and records every call;
//! `DeferredTransport` parks each call until the test resolves it, so state
//! can be observed while a request is in flight.
//!
//! Each test binary uses a different subset, hence the per-item
//! `dead_code` allowances.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rfms_client::domain::ports::{
    ApiRequest, ApiResponse, HttpMethod, NoticeKind, Transport, TransportError,
};
use rfms_client::domain::{Notice, NotificationRelay};
use tokio::sync::{Notify, oneshot};

type Reply = Result<ApiResponse, TransportError>;

fn route(method: HttpMethod, path: &str) -> String {
    format!("{} {path}", method.as_str())
}

/// Answers requests from queued replies keyed by method and path.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Queue `reply` for the next `method path` call.
    pub fn respond(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(route(method, path))
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `method path` calls received.
    #[allow(dead_code)]
    pub fn calls(&self, method: HttpMethod, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = route(request.method, &request.path);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::network(format!("no reply scripted for {key}"))))
    }
}

/// A request parked inside [`DeferredTransport`].
#[allow(dead_code)]
pub struct PendingCall {
    /// The request as sent.
    pub request: ApiRequest,
    reply: oneshot::Sender<Reply>,
}

impl PendingCall {
    /// Settle the call.
    #[allow(dead_code)]
    pub fn resolve(self, reply: Reply) {
        if self.reply.send(reply).is_err() {
            panic!("caller dropped before {} {} settled", self.request.method, self.request.path);
        }
    }
}

/// Parks every call until the test resolves it.
#[allow(dead_code)]
#[derive(Default)]
pub struct DeferredTransport {
    pending: Mutex<VecDeque<PendingCall>>,
    arrived: Notify,
}

impl DeferredTransport {
    /// Wait for the next parked call, oldest first.
    #[allow(dead_code)]
    pub async fn next_call(&self) -> PendingCall {
        loop {
            let call = self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            if let Some(call) = call {
                return call;
            }
            self.arrived.notified().await;
        }
    }
}

#[async_trait]
impl Transport for DeferredTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let (reply, settled) = oneshot::channel();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(PendingCall { request, reply });
        self.arrived.notify_one();
        settled
            .await
            .unwrap_or_else(|_| Err(TransportError::network("call abandoned")))
    }
}

/// Queued notices of one kind.
pub fn notices_of(relay: &NotificationRelay, kind: NoticeKind) -> Vec<Notice> {
    relay
        .notices()
        .into_iter()
        .filter(|notice| notice.kind == kind)
        .collect()
}
