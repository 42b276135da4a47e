//! Stations and their installed equipment.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::store::{
    ChildStore, Exportable, Importable, Resource, ResourceStore, StoreCore,
};
use crate::domain::{Station, StationDraft, StationEquipment, StationEquipmentDraft};

/// `stations/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Stations;

impl Resource for Stations {
    type Entity = Station;
    type Draft = StationDraft;
    const PATH: &'static str = "stations/";
    const NOUN: &'static str = "station";
    const PLURAL: &'static str = "stations";
    const TITLE: &'static str = "Station";
}

impl Importable for Stations {
    const IMPORT_PATH: &'static str = "stations/import_stations_file/";
}

impl Exportable for Stations {
    const EXPORT_PATH: &'static str = "stations/export_to_excel/";
    const EXPORT_FILE_NAME: &'static str = "stations_equipment_export.xlsx";
}

/// `station-equipments/` collection.
#[derive(Debug, Clone, Copy)]
pub struct StationEquipments;

impl Resource for StationEquipments {
    type Entity = StationEquipment;
    type Draft = StationEquipmentDraft;
    const PATH: &'static str = "station-equipments/";
    const NOUN: &'static str = "station equipment";
    const PLURAL: &'static str = "station equipment";
    const TITLE: &'static str = "Station equipment";
}

/// Station list plus equipment editing.
///
/// Equipment is saved row by row when a station form is submitted, so
/// equipment actions stay silent on success and keep their own busy flag.
pub struct StationStore<T: ?Sized, N: ?Sized> {
    stations: ResourceStore<Stations, T, N>,
    equipment: ChildStore<StationEquipments, T, N>,
}

impl<T: ?Sized, N: ?Sized> StationStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        let core = StoreCore::new(transport, notifier);
        Self {
            equipment: ChildStore::from_core(core.clone()).quiet(),
            stations: ResourceStore::from_core(core),
        }
    }

    /// Override how long partial-import warnings stay queued.
    #[must_use]
    pub fn with_warning_ttl(mut self, warning_ttl: Duration) -> Self {
        self.stations = self.stations.with_warning_ttl(warning_ttl);
        self
    }

    /// Station equipment actions.
    pub fn equipment(&self) -> &ChildStore<StationEquipments, T, N> {
        &self.equipment
    }
}

impl<T: ?Sized, N: ?Sized> Deref for StationStore<T, N> {
    type Target = ResourceStore<Stations, T, N>;

    fn deref(&self) -> &Self::Target {
        &self.stations
    }
}
