//! Generic CRUD store over one REST collection.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::activity::Activity;
use super::plumbing::{Failure, StoreCore, decode_echo, decode_entity};
use super::resource::{EntityId, Exportable, Importable, Resource};
use super::slot::SyncSlot;
use crate::domain::ports::{
    ApiRequest, FileSink, NoticeDraft, Notifier, Transport, TransportError,
};
use crate::domain::{ImportOutcome, ImportReport, StoreError, UploadFile};

/// Lifetime of partial-import warnings.
pub const IMPORT_WARNING_TTL: Duration = Duration::from_secs(10);

const SUCCESS_TITLE: &str = "Success";
const UPLOAD_FAILED: &str = "File upload failed.";

/// State and actions for one collection.
///
/// The collection is only ever replaced wholesale from a list response;
/// mutations never patch it locally and instead trigger one refetch.
pub struct ResourceStore<R: Resource, T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    collection: SyncSlot<Vec<R::Entity>>,
    current: SyncSlot<Option<R::Entity>>,
    warning_ttl: Duration,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: ?Sized, N: ?Sized> ResourceStore<R, T, N> {
    /// Create a store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self::from_core(StoreCore::new(transport, notifier))
    }

    /// Create a store sharing an existing core.
    pub fn from_core(core: StoreCore<T, N>) -> Self {
        Self {
            core,
            activity: Activity::default(),
            collection: SyncSlot::new(Vec::new()),
            current: SyncSlot::new(None),
            warning_ttl: IMPORT_WARNING_TTL,
            _resource: PhantomData,
        }
    }

    /// Override how long partial-import warnings stay queued.
    #[must_use]
    pub fn with_warning_ttl(mut self, warning_ttl: Duration) -> Self {
        self.warning_ttl = warning_ttl;
        self
    }

    /// Entities from the latest list response, in server order.
    pub fn collection(&self) -> Vec<R::Entity> {
        self.collection.get()
    }

    /// Entity loaded by [`Self::fetch_one`].
    pub fn current(&self) -> Option<R::Entity> {
        self.current.get()
    }

    /// Whether an action is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }

    pub(crate) fn core(&self) -> &StoreCore<T, N> {
        &self.core
    }

    pub(crate) fn activity(&self) -> &Activity {
        &self.activity
    }
}

impl<R, T, N> ResourceStore<R, T, N>
where
    R: Resource,
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Replace the collection with the server's list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the fixed message
    /// `Failed to fetch <plural>.`; the collection keeps its previous value.
    pub async fn fetch_all(&self) -> Result<Vec<R::Entity>, StoreError> {
        let fallback = format!("Failed to fetch {}.", R::PLURAL);
        self.core
            .load_list(
                &self.activity,
                &self.collection,
                ApiRequest::get(R::PATH),
                Failure::fixed(&fallback),
            )
            .await
    }

    /// Load one entity into `current`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the request fails or the body is not an
    /// entity.
    pub async fn fetch_one(&self, id: EntityId) -> Result<R::Entity, StoreError> {
        let fallback = format!("Failed to fetch {}.", R::NOUN);
        let loaded = self
            .core
            .load(
                &self.activity,
                &self.current,
                ApiRequest::get(R::entity_path(id)),
                Failure::fixed(&fallback),
                |response| decode_entity(response, &fallback).map(Some),
            )
            .await?;
        loaded.ok_or_else(|| StoreError::decode(fallback.as_str()))
    }

    /// Create an entity and resynchronise the collection.
    ///
    /// Returns the server's echo of the entity when the body decodes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary when
    /// there is one. The collection is left untouched.
    pub async fn create(&self, draft: &R::Draft) -> Result<Option<R::Entity>, StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Failed to add {}.", R::NOUN);
        let body = self.encode(draft, &fallback)?;
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::post(R::PATH, body),
                Failure::detailed(&fallback),
            )
            .await?;
        self.core.notify(NoticeDraft::success(
            SUCCESS_TITLE,
            format!("{} added.", R::TITLE),
        ));
        let created = decode_echo(response);
        self.resync().await;
        Ok(created)
    }

    /// Patch an entity and resynchronise the collection.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::create`].
    pub async fn update(
        &self,
        id: EntityId,
        draft: &R::Draft,
    ) -> Result<Option<R::Entity>, StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Failed to update {}.", R::NOUN);
        let body = self.encode(draft, &fallback)?;
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::patch(R::entity_path(id), body),
                Failure::detailed(&fallback),
            )
            .await?;
        self.core.notify(NoticeDraft::success(
            SUCCESS_TITLE,
            format!("{} updated.", R::TITLE),
        ));
        let updated = decode_echo(response);
        self.resync().await;
        Ok(updated)
    }

    /// Delete an entity and resynchronise the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the fixed message
    /// `Failed to remove <noun>.`.
    pub async fn remove(&self, id: EntityId) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Failed to remove {}.", R::NOUN);
        self.core
            .send(
                &self.activity,
                ApiRequest::delete(R::entity_path(id)),
                Failure::fixed(&fallback),
            )
            .await?;
        self.core.notify(NoticeDraft::success(
            SUCCESS_TITLE,
            format!("{} removed.", R::TITLE),
        ));
        self.resync().await;
        Ok(())
    }

    /// Refetch after a successful mutation. A failing refetch has already
    /// recorded its own error, so the mutation still reports success.
    pub(crate) async fn resync(&self) {
        if let Err(error) = self.fetch_all().await {
            debug!(message = error.message(), "refetch after mutation failed");
        }
    }

    fn encode(
        &self,
        draft: &R::Draft,
        fallback: &str,
    ) -> Result<serde_json::Value, StoreError> {
        serde_json::to_value(draft).map_err(|error| {
            debug!(%error, "draft did not serialise");
            let store_error = StoreError::decode(fallback);
            self.core.fail(&self.activity, &store_error, "Error");
            store_error
        })
    }
}

impl<R, T, N> ResourceStore<R, T, N>
where
    R: Importable,
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Upload a spreadsheet to the import endpoint.
    ///
    /// Row-level problems are surfaced as a long-lived warning rather than an
    /// error, whether the server answered 2xx or 4xx.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the server rejects the upload.
    pub async fn import_file(&self, file: UploadFile) -> Result<ImportOutcome, StoreError> {
        let _busy = self.activity.begin();
        let request = ApiRequest::multipart(R::IMPORT_PATH, R::IMPORT_FIELD, file);
        let response = match self.core.send_raw(request).await {
            Ok(response) => response,
            Err(error) => return Err(self.import_failed(&error)),
        };

        let report = ImportReport::from_value(&response.into_json());
        if report.has_row_errors() {
            self.core.notify(
                NoticeDraft::warning("Import Issues", report.warning_message())
                    .with_ttl(self.warning_ttl),
            );
        } else {
            self.core
                .notify(NoticeDraft::success("Import Complete", report.headline()));
        }
        let outcome = report.into_outcome();
        self.resync().await;
        Ok(outcome)
    }

    fn import_failed(&self, error: &TransportError) -> StoreError {
        let report = match error {
            TransportError::Status { body, .. } => ImportReport::from_body(body),
            _ => ImportReport::default(),
        };
        if !report.has_row_errors() {
            let store_error = StoreError::detailed(error, UPLOAD_FAILED);
            self.core.fail(&self.activity, &store_error, "Import Failed");
            return store_error;
        }

        let message = report.warning_message();
        let store_error = StoreError::fixed(error, &message);
        warn!(message = %message, "import finished with row errors");
        self.activity.record_error(message.as_str());
        self.core.notify(
            NoticeDraft::warning("Import Issues", message).with_ttl(self.warning_ttl),
        );
        store_error
    }
}

impl<R, T, N> ResourceStore<R, T, N>
where
    R: Exportable,
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Download the spreadsheet export and hand it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the download or the save fails.
    pub async fn export_file<S>(&self, sink: &S) -> Result<PathBuf, StoreError>
    where
        S: FileSink + ?Sized,
    {
        let _busy = self.activity.begin();
        let fallback = format!("Failed to export {} data.", R::NOUN);
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::get(R::EXPORT_PATH).binary(),
                Failure::fixed(&fallback).titled("Export Error"),
            )
            .await?;
        let bytes = response.into_bytes();
        match sink.save(R::EXPORT_FILE_NAME, &bytes) {
            Ok(path) => {
                self.core.notify(NoticeDraft::success(
                    SUCCESS_TITLE,
                    format!("{} data exported to {}.", R::TITLE, path.display()),
                ));
                Ok(path)
            }
            Err(error) => {
                let store_error = StoreError::from(error);
                self.core.fail(&self.activity, &store_error, "Export Error");
                Err(store_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreErrorKind;
    use crate::domain::ports::{
        ApiResponse, FileSinkError, HttpMethod, MockFileSink, MockNotifier, MockTransport,
        NoticeId, NoticeKind, RequestBody,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Widget {
        id: u64,
        name: String,
    }

    #[derive(Debug, Serialize)]
    struct WidgetDraft {
        name: String,
    }

    struct Widgets;

    impl Resource for Widgets {
        type Entity = Widget;
        type Draft = WidgetDraft;
        const PATH: &'static str = "widgets/";
        const NOUN: &'static str = "widget";
        const PLURAL: &'static str = "widgets";
        const TITLE: &'static str = "Widget";
    }

    impl Importable for Widgets {
        const IMPORT_PATH: &'static str = "widgets/import_from_excel/";
    }

    impl Exportable for Widgets {
        const EXPORT_PATH: &'static str = "widgets/export_to_excel/";
        const EXPORT_FILE_NAME: &'static str = "widgets_export.xlsx";
    }

    type Store = ResourceStore<Widgets, MockTransport, MockNotifier>;

    fn store(transport: MockTransport, notifier: MockNotifier) -> Store {
        ResourceStore::new(Arc::new(transport), Arc::new(notifier))
    }

    fn widgets() -> serde_json::Value {
        json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}])
    }

    fn expect_notices(notifier: &mut MockNotifier, kind: NoticeKind, times: usize) {
        notifier
            .expect_push()
            .withf(move |draft| draft.kind == kind)
            .times(times)
            .returning(|_| NoticeId::new(1));
    }

    #[tokio::test]
    async fn fetch_all_accepts_paginated_envelopes() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Get && request.path == "widgets/")
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"count": 2, "results": widgets()}))));
        let store = store(transport, MockNotifier::new());

        let fetched = store.fetch_all().await.expect("fetch succeeds");

        assert_eq!(fetched.len(), 2);
        assert_eq!(store.collection(), fetched);
        assert!(!store.is_busy());
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn fetch_all_failure_keeps_the_collection() {
        let mut transport = MockTransport::new();
        let mut calls = 0;
        transport.expect_send().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(ApiResponse::json(widgets()))
            } else {
                Err(TransportError::timeout("35s"))
            }
        });
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Error, 1);
        let store = store(transport, notifier);

        store.fetch_all().await.expect("first fetch succeeds");
        let error = store.fetch_all().await.expect_err("second fetch fails");

        assert_eq!(error.kind(), &StoreErrorKind::Timeout);
        assert_eq!(store.last_error().as_deref(), Some("Failed to fetch widgets."));
        assert_eq!(store.collection().len(), 2);
    }

    #[tokio::test]
    async fn fetch_one_fills_current() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "widgets/7/")
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"id": 7, "name": "G"}))));
        let store = store(transport, MockNotifier::new());

        let widget = store.fetch_one(7).await.expect("fetch succeeds");
        assert_eq!(store.current(), Some(widget));
    }

    #[tokio::test]
    async fn rejected_create_reports_validation_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Post)
            .times(1)
            .returning(|_| Err(TransportError::status(400_u16, r#"{"name": ["required"]}"#)));
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Error, 1);
        let store = store(transport, notifier);

        let error = store
            .create(&WidgetDraft { name: String::new() })
            .await
            .expect_err("create is rejected");

        assert!(error.message().contains("required"));
        assert!(store.last_error().is_some_and(|message| message.contains("required")));
        assert!(store.collection().is_empty());
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn successful_create_refetches_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Post
                    && request.body == RequestBody::Json(json!({"name": "C"}))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"id": 3, "name": "C"})).with_status(201)));
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Get)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(widgets())));
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Success, 1);
        let store = store(transport, notifier);

        let created = store
            .create(&WidgetDraft {
                name: "C".to_owned(),
            })
            .await
            .expect("create succeeds");

        assert_eq!(created.map(|widget| widget.id), Some(3));
        assert_eq!(store.collection().len(), 2, "collection comes from the refetch");
    }

    #[tokio::test]
    async fn remove_failure_uses_the_fixed_message() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::status(409_u16, r#"{"detail": "in use"}"#)));
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Error, 1);
        let store = store(transport, notifier);

        let error = store.remove(4).await.expect_err("remove fails");
        assert_eq!(error.message(), "Failed to remove widget.");
        assert_eq!(error.status(), Some(409));
    }

    #[tokio::test]
    async fn partial_import_is_a_warning() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                matches!(&request.body, RequestBody::Multipart { field, .. } if field == "file")
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(json!({
                    "message": "Import complete.",
                    "errors": ["row 3 bad", "row 7 bad"]
                }))
                .with_status(207))
            });
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Get)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!([]))));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| {
                draft.kind == NoticeKind::Warning
                    && draft.message.contains("row 3 bad")
                    && draft.ttl == Some(IMPORT_WARNING_TTL)
            })
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = store(transport, notifier);

        let outcome = store
            .import_file(UploadFile::new("widgets.xlsx", b"xlsx".to_vec()))
            .await
            .expect("import succeeds");
        assert!(outcome.is_partial());
    }

    #[tokio::test]
    async fn rejected_import_without_rows_is_an_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::status(400_u16, r#"{"error": "No file provided."}"#)));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Error && draft.title == "Import Failed")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = store(transport, notifier);

        let error = store
            .import_file(UploadFile::new("widgets.xlsx", Vec::new()))
            .await
            .expect_err("import fails");
        assert_eq!(error.message(), "No file provided.");
    }

    #[tokio::test]
    async fn export_saves_through_the_sink() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "widgets/export_to_excel/")
            .times(1)
            .returning(|_| Ok(ApiResponse::binary(b"PK".to_vec())));
        let mut sink = MockFileSink::new();
        sink.expect_save()
            .withf(|name, bytes| name == "widgets_export.xlsx" && bytes == b"PK")
            .times(1)
            .returning(|name, _| Ok(PathBuf::from("exports").join(name)));
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Success, 1);
        let store = store(transport, notifier);

        let path = store.export_file(&sink).await.expect("export succeeds");
        assert_eq!(path, PathBuf::from("exports/widgets_export.xlsx"));
    }

    #[tokio::test]
    async fn export_reports_sink_failures() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::binary(b"PK".to_vec())));
        let mut sink = MockFileSink::new();
        sink.expect_save()
            .times(1)
            .returning(|_, _| Err(FileSinkError::io("disk full")));
        let mut notifier = MockNotifier::new();
        expect_notices(&mut notifier, NoticeKind::Error, 1);
        let store = store(transport, notifier);

        let error = store.export_file(&sink).await.expect_err("save fails");
        assert_eq!(error.kind(), &StoreErrorKind::Storage);
        assert!(store.last_error().is_some());
    }
}
