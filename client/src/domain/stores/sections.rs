//! Sections, sub-sections and assets.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{ApiRequest, Notifier, Transport};
use crate::domain::store::{
    ChildStore, EntityId, Failure, Importable, Resource, ResourceStore, StoreCore, SyncSlot,
};
use crate::domain::{
    Asset, AssetDraft, Section, SectionDraft, StoreError, SubSection, SubSectionDraft,
};

/// `sections/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Sections;

impl Resource for Sections {
    type Entity = Section;
    type Draft = SectionDraft;
    const PATH: &'static str = "sections/";
    const NOUN: &'static str = "section";
    const PLURAL: &'static str = "sections";
    const TITLE: &'static str = "Section";
}

impl Importable for Sections {
    const IMPORT_PATH: &'static str = "sections/import_master_file/";
}

/// `subsections/` collection.
#[derive(Debug, Clone, Copy)]
pub struct SubSections;

impl Resource for SubSections {
    type Entity = SubSection;
    type Draft = SubSectionDraft;
    const PATH: &'static str = "subsections/";
    const NOUN: &'static str = "sub-section";
    const PLURAL: &'static str = "sub-sections";
    const TITLE: &'static str = "Sub-section";
}

/// `assets/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Assets;

impl Resource for Assets {
    type Entity = Asset;
    type Draft = AssetDraft;
    const PATH: &'static str = "assets/";
    const NOUN: &'static str = "asset";
    const PLURAL: &'static str = "assets";
    const TITLE: &'static str = "Asset";
}

/// Section list, the sub-sections of one section, and asset editing.
pub struct SectionStore<T: ?Sized, N: ?Sized> {
    sections: ResourceStore<Sections, T, N>,
    section_subsections: SyncSlot<Vec<SubSection>>,
    subsections: ChildStore<SubSections, T, N>,
    assets: ChildStore<Assets, T, N>,
}

impl<T: ?Sized, N: ?Sized> SectionStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        let core = StoreCore::new(transport, notifier);
        Self {
            section_subsections: SyncSlot::new(Vec::new()),
            subsections: ChildStore::from_core(core.clone()),
            assets: ChildStore::from_core(core.clone()).quiet(),
            sections: ResourceStore::from_core(core),
        }
    }

    /// Override how long partial-import warnings stay queued.
    #[must_use]
    pub fn with_warning_ttl(mut self, warning_ttl: Duration) -> Self {
        self.sections = self.sections.with_warning_ttl(warning_ttl);
        self
    }

    /// Sub-sections loaded by [`Self::fetch_subsections`].
    pub fn section_subsections(&self) -> Vec<SubSection> {
        self.section_subsections.get()
    }

    /// Sub-section actions.
    pub fn subsections(&self) -> &ChildStore<SubSections, T, N> {
        &self.subsections
    }

    /// Asset actions; successes are silent.
    pub fn assets(&self) -> &ChildStore<Assets, T, N> {
        &self.assets
    }
}

impl<T, N> SectionStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load the sub-sections of one section.
    ///
    /// Shares the section list's busy flag and last error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch sub-sections.`; the
    /// previously loaded sub-sections are kept.
    pub async fn fetch_subsections(
        &self,
        section_id: EntityId,
    ) -> Result<Vec<SubSection>, StoreError> {
        let request =
            ApiRequest::get(SubSections::PATH).with_query("section", section_id.to_string());
        self.sections
            .core()
            .load_list(
                self.sections.activity(),
                &self.section_subsections,
                request,
                Failure::fixed("Failed to fetch sub-sections."),
            )
            .await
    }
}

impl<T: ?Sized, N: ?Sized> Deref for SectionStore<T, N> {
    type Target = ResourceStore<Sections, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ApiResponse, MockNotifier, MockTransport, NoticeId, NoticeKind};
    use serde_json::json;

    #[tokio::test]
    async fn subsections_are_filtered_by_section() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.path == "subsections/"
                    && request.query == vec![("section".to_owned(), "5".to_owned())]
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(json!({
                    "count": 1,
                    "results": [{"id": 8, "name": "Up line", "section": 5}]
                })))
            });
        let store = SectionStore::new(Arc::new(transport), Arc::new(MockNotifier::new()));

        let loaded = store.fetch_subsections(5).await.expect("fetch succeeds");

        assert_eq!(loaded.len(), 1);
        assert_eq!(store.section_subsections(), loaded);
        assert!(store.collection().is_empty(), "section list is untouched");
    }

    #[tokio::test]
    async fn added_subsection_is_returned() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::json(json!({"id": 21, "name": "Down line", "section": 5}))));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.kind == NoticeKind::Success && draft.message == "Sub-section added.")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = SectionStore::new(Arc::new(transport), Arc::new(notifier));

        let created = store
            .subsections()
            .add(&SubSectionDraft {
                name: "Down line".to_owned(),
                section: 5,
            })
            .await
            .expect("add succeeds");
        assert_eq!(created.map(|subsection| subsection.id), Some(21));
    }
}
