//! Report delivery schedules.

use std::ops::Deref;
use std::sync::Arc;

use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};
use crate::domain::store::{EntityId, Failure, Resource, ResourceStore};
use crate::domain::{ReportSchedule, ReportScheduleDraft, StoreError, UploadFile};

/// `reports/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Reports;

impl Resource for Reports {
    type Entity = ReportSchedule;
    type Draft = ReportScheduleDraft;
    const PATH: &'static str = "reports/";
    const NOUN: &'static str = "report schedule";
    const PLURAL: &'static str = "report schedules";
    const TITLE: &'static str = "Report schedule";
}

/// Form field carrying a report template.
pub const TEMPLATE_FIELD: &str = "template";

/// Report schedules plus template uploads.
pub struct ReportStore<T: ?Sized, N: ?Sized> {
    schedules: ResourceStore<Reports, T, N>,
}

impl<T: ?Sized, N: ?Sized> ReportStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            schedules: ResourceStore::new(transport, notifier),
        }
    }
}

impl<T, N> ReportStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Attach a spreadsheet template to a schedule and refetch schedules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Could not upload template.`.
    pub async fn upload_template(
        &self,
        schedule_id: EntityId,
        file: UploadFile,
    ) -> Result<(), StoreError> {
        let _busy = self.schedules.activity().begin();
        let path = format!("{}upload_template/", Reports::entity_path(schedule_id));
        self.schedules
            .core()
            .send(
                self.schedules.activity(),
                ApiRequest::multipart(path, TEMPLATE_FIELD, file),
                Failure::fixed("Could not upload template.").titled("Upload Failed"),
            )
            .await?;
        self.schedules
            .core()
            .notify(NoticeDraft::success("Success", "Template uploaded."));
        self.schedules.resync().await;
        Ok(())
    }
}

impl<T: ?Sized, N: ?Sized> Deref for ReportStore<T, N> {
    type Target = ResourceStore<Reports, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.schedules
    }
}
