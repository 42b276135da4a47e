//! Paged, filterable failure logbook.

use std::sync::Arc;

use pagination::Page;

use crate::domain::ports::{ApiRequest, Notifier, Transport};
use crate::domain::store::{Activity, Failure, StoreCore, SyncSlot, decode_entity};
use crate::domain::{FailureLog, LogbookQuery, StoreError};

const LOGBOOK_PATH: &str = "logbook/data/";
const FETCH_FAILED: &str = "Failed to fetch logbook data.";

/// The current logbook page.
pub struct LogbookStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    page: SyncSlot<Page<FailureLog>>,
}

impl<T: ?Sized, N: ?Sized> LogbookStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            page: SyncSlot::new(Page::default()),
        }
    }

    /// Page from the latest response.
    pub fn page(&self) -> Page<FailureLog> {
        self.page.get()
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

impl<T, N> LogbookStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load one page of the logbook.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch logbook data.`; the
    /// previous page is kept.
    pub async fn fetch(&self, query: &LogbookQuery) -> Result<Page<FailureLog>, StoreError> {
        let mut request = ApiRequest::get(LOGBOOK_PATH);
        request.query = query.to_query();
        self.core
            .load(
                &self.activity,
                &self.page,
                request,
                Failure::fixed(FETCH_FAILED),
                |response| decode_entity(response, FETCH_FAILED),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ApiResponse, MockNotifier, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn pages_replace_each_other() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.path == LOGBOOK_PATH
                    && request.query.contains(&("page".to_owned(), "2".to_owned()))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(json!({
                    "count": 26,
                    "num_pages": 2,
                    "results": [{"id": 26, "reported_at": "2024-05-02T10:00:00Z"}]
                })))
            });
        let store = LogbookStore::new(Arc::new(transport), Arc::new(MockNotifier::new()));

        let query = LogbookQuery {
            page: Some(2),
            rows_per_page: Some(25),
            ..LogbookQuery::default()
        };
        let page = store.fetch(&query).await.expect("fetch succeeds");

        assert_eq!(page.num_pages, 2);
        assert_eq!(store.page().results[0].id, 26);
    }
}
