//! Depots and the equipment they hold.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::store::{
    ChildStore, Exportable, Importable, Resource, ResourceStore, StoreCore,
};
use crate::domain::{Depot, DepotDraft, Equipment, EquipmentDraft};

/// `depots/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Depots;

impl Resource for Depots {
    type Entity = Depot;
    type Draft = DepotDraft;
    const PATH: &'static str = "depots/";
    const NOUN: &'static str = "depot";
    const PLURAL: &'static str = "depots";
    const TITLE: &'static str = "Depot";
}

impl Importable for Depots {
    const IMPORT_PATH: &'static str = "depots/import_from_excel/";
}

impl Exportable for Depots {
    const EXPORT_PATH: &'static str = "depots/export-excel/";
    const EXPORT_FILE_NAME: &'static str = "depot_equipment_export.xlsx";
}

/// `equipments/` collection, shown nested inside each depot.
#[derive(Debug, Clone, Copy)]
pub struct DepotEquipment;

impl Resource for DepotEquipment {
    type Entity = Equipment;
    type Draft = EquipmentDraft;
    const PATH: &'static str = "equipments/";
    const NOUN: &'static str = "equipment";
    const PLURAL: &'static str = "equipment";
    const TITLE: &'static str = "Equipment";
}

/// Depot list plus equipment editing.
///
/// Dereferences to the depot [`ResourceStore`]. Equipment changes announce
/// themselves but do not refetch depots; callers refresh when the edit
/// session ends.
pub struct DepotStore<T: ?Sized, N: ?Sized> {
    depots: ResourceStore<Depots, T, N>,
    equipment: ChildStore<DepotEquipment, T, N>,
}

impl<T: ?Sized, N: ?Sized> DepotStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        let core = StoreCore::new(transport, notifier);
        Self {
            equipment: ChildStore::from_core(core.clone()),
            depots: ResourceStore::from_core(core),
        }
    }

    /// Override how long partial-import warnings stay queued.
    #[must_use]
    pub fn with_warning_ttl(mut self, warning_ttl: Duration) -> Self {
        self.depots = self.depots.with_warning_ttl(warning_ttl);
        self
    }

    /// Equipment actions.
    pub fn equipment(&self) -> &ChildStore<DepotEquipment, T, N> {
        &self.equipment
    }
}

impl<T: ?Sized, N: ?Sized> Deref for DepotStore<T, N> {
    type Target = ResourceStore<Depots, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.depots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ApiResponse, HttpMethod, MockNotifier, MockTransport, NoticeId, TransportError,
    };
    use serde_json::json;

    #[tokio::test]
    async fn equipment_failures_use_the_equipment_wording() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.method == HttpMethod::Post && request.path == "equipments/")
            .times(1)
            .returning(|_| Err(TransportError::status(500_u16, "<html>boom</html>")));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_push()
            .withf(|draft| draft.message == "Could not add equipment.")
            .times(1)
            .returning(|_| NoticeId::new(1));
        let store = DepotStore::new(Arc::new(transport), Arc::new(notifier));

        let draft = EquipmentDraft {
            depot: 1,
            name: "Relay".to_owned(),
            ..EquipmentDraft::default()
        };
        store.equipment().add(&draft).await.expect_err("server fails");

        assert_eq!(
            store.equipment().last_error().as_deref(),
            Some("Could not add equipment.")
        );
        assert!(store.last_error().is_none(), "depot state is separate");
    }

    #[tokio::test]
    async fn depots_dereference_to_the_collection() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "depots/")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(json!([
                    {"id": 1, "name": "North", "location": "Yard 1"}
                ])))
            });
        let store = DepotStore::new(Arc::new(transport), Arc::new(MockNotifier::new()));

        store.fetch_all().await.expect("fetch succeeds");
        assert_eq!(store.collection()[0].name, "North");
    }
}
