//! Files attached to a failure log.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{Activity, EntityId, Failure, StoreCore, SyncSlot, decode_echo};
use crate::domain::{Attachment, StoreError, UploadFile};

const ATTACHMENTS_PATH: &str = "failures/attachments/";
const FILE_FIELD: &str = "file";

/// Attachments of one failure log at a time.
pub struct AttachmentStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    attachments: SyncSlot<Vec<Attachment>>,
}

impl<T: ?Sized, N: ?Sized> AttachmentStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            attachments: SyncSlot::new(Vec::new()),
        }
    }

    /// Attachments from the latest [`Self::fetch`].
    pub fn attachments(&self) -> Vec<Attachment> {
        self.attachments.get()
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

impl<T, N> AttachmentStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Replace the list with the attachments of `failure_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch attachments.`.
    pub async fn fetch(&self, failure_id: EntityId) -> Result<Vec<Attachment>, StoreError> {
        self.core
            .load_list(
                &self.activity,
                &self.attachments,
                ApiRequest::get(ATTACHMENTS_PATH).with_query("failure", failure_id.to_string()),
                Failure::fixed("Failed to fetch attachments."),
            )
            .await
    }

    /// Upload `file` against `failure_id`, then reload its attachments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Could not upload file.`.
    pub async fn upload(
        &self,
        failure_id: EntityId,
        file: UploadFile,
        description: &str,
    ) -> Result<Option<Attachment>, StoreError> {
        let _busy = self.activity.begin();
        let request = ApiRequest::multipart(ATTACHMENTS_PATH, FILE_FIELD, file)
            .with_form_field("failure", failure_id.to_string())
            .with_form_field("description", description);
        let response = self
            .core
            .send(
                &self.activity,
                request,
                Failure::fixed("Could not upload file.").titled("Upload Failed"),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Success", "File uploaded."));
        self.refetch(failure_id).await;
        Ok(decode_echo(response))
    }

    /// Delete an attachment, then reload the attachments of `failure_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Could not remove attachment.`.
    pub async fn remove(
        &self,
        attachment_id: EntityId,
        failure_id: EntityId,
    ) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        self.core
            .send(
                &self.activity,
                ApiRequest::delete(format!("{ATTACHMENTS_PATH}{attachment_id}/")),
                Failure::fixed("Could not remove attachment."),
            )
            .await?;
        self.core
            .notify(NoticeDraft::success("Deleted", "Attachment removed."));
        self.refetch(failure_id).await;
        Ok(())
    }

    async fn refetch(&self, failure_id: EntityId) {
        if let Err(error) = self.fetch(failure_id).await {
            debug!(message = error.message(), failure_id, "attachment refetch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ApiResponse, HttpMethod, MockNotifier, MockTransport, NoticeId, NoticeKind,
        RequestBody, TransportError,
    };
    use serde_json::json;

    fn attachment(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "failure": 9,
            "file": format!("/media/attachments/photo-{id}.jpg"),
            "description": "Burnt relay",
            "uploaded_at": "2024-05-01T09:15:00+05:30"
        })
    }

    fn is_attachment_list(request: &ApiRequest) -> bool {
        request.method == HttpMethod::Get
            && request.path == ATTACHMENTS_PATH
            && request.query == vec![("failure".to_owned(), "9".to_owned())]
    }

    #[tokio::test]
    async fn upload_sends_failure_and_description_then_refetches() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Post
                    && matches!(&request.body, RequestBody::Multipart { field, file, fields }
                        if field == FILE_FIELD
                            && file.file_name() == "relay.jpg"
                            && fields == &vec![
                                ("failure".to_owned(), "9".to_owned()),
                                ("description".to_owned(), "Burnt relay".to_owned()),
                            ])
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::json(attachment(31))));
        transport
            .expect_send()
            .withf(is_attachment_list)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"count": 1, "results": [attachment(31)]}))));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Success && draft.message == "File uploaded.")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = AttachmentStore::new(Arc::new(transport), Arc::new(notifier));

        let created = store
            .upload(9, UploadFile::new("relay.jpg", b"\xff\xd8".to_vec()), "Burnt relay")
            .await
            .expect("upload succeeds");

        assert_eq!(created.map(|attachment| attachment.id), Some(31));
        assert_eq!(store.attachments().len(), 1);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn failed_upload_keeps_the_list_and_reports_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Post)
            .times(1)
            .returning(|_| Err(TransportError::status(413_u16, "<html>too large</html>")));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Error && draft.title == "Upload Failed")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = AttachmentStore::new(Arc::new(transport), Arc::new(notifier));

        let error = store
            .upload(9, UploadFile::new("huge.pdf", vec![0_u8; 8]), "")
            .await
            .expect_err("upload fails");

        assert_eq!(error.message(), "Could not upload file.");
        assert_eq!(store.last_error().as_deref(), Some("Could not upload file."));
        assert!(store.attachments().is_empty());
    }

    #[tokio::test]
    async fn remove_deletes_by_attachment_id_and_refetches_the_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Delete && request.path == "failures/attachments/31/"
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::no_content()));
        transport
            .expect_send()
            .withf(is_attachment_list)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!([]))));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Success && draft.title == "Deleted")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = AttachmentStore::new(Arc::new(transport), Arc::new(notifier));

        store.remove(31, 9).await.expect("remove succeeds");

        assert!(store.attachments().is_empty());
        assert_eq!(store.last_error(), None);
    }
}
