//! Read-only infrastructure tree.
//!
//! Each level of the tree loads independently and keeps its own busy flag,
//! so a slow station list never blocks the depot picker.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::ports::{ApiRequest, Notifier, Transport};
use crate::domain::store::{Activity, Failure, StoreCore, SyncSlot};
use crate::domain::{Circuit, Depot, Section, Station, StoreError, Supervisor};

/// One level of the tree.
#[derive(Debug)]
pub struct TreeLevel<E> {
    path: &'static str,
    failure: &'static str,
    activity: Activity,
    items: SyncSlot<Vec<E>>,
}

impl<E: Clone> TreeLevel<E> {
    fn new(path: &'static str, failure: &'static str) -> Self {
        Self {
            path,
            failure,
            activity: Activity::default(),
            items: SyncSlot::new(Vec::new()),
        }
    }

    /// Items from the latest response.
    pub fn items(&self) -> Vec<E> {
        self.items.get()
    }

    /// Whether this level is loading.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }
}

/// Depots, stations, sections, circuits and supervisors under
/// `infrastructure/`.
pub struct InfrastructureStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    depots: TreeLevel<Depot>,
    stations: TreeLevel<Station>,
    sections: TreeLevel<Section>,
    circuits: TreeLevel<Circuit>,
    supervisors: TreeLevel<Supervisor>,
}

impl<T: ?Sized, N: ?Sized> InfrastructureStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            depots: TreeLevel::new("infrastructure/depots/", "Failed to fetch depots."),
            stations: TreeLevel::new("infrastructure/stations/", "Failed to fetch stations."),
            sections: TreeLevel::new("infrastructure/sections/", "Failed to fetch sections."),
            circuits: TreeLevel::new("infrastructure/circuits/", "Failed to fetch circuits."),
            supervisors: TreeLevel::new(
                "infrastructure/supervisors/",
                "Failed to fetch supervisors.",
            ),
        }
    }

    /// Depot level.
    pub fn depots(&self) -> &TreeLevel<Depot> {
        &self.depots
    }

    /// Station level.
    pub fn stations(&self) -> &TreeLevel<Station> {
        &self.stations
    }

    /// Section level.
    pub fn sections(&self) -> &TreeLevel<Section> {
        &self.sections
    }

    /// Circuit level.
    pub fn circuits(&self) -> &TreeLevel<Circuit> {
        &self.circuits
    }

    /// Supervisor level.
    pub fn supervisors(&self) -> &TreeLevel<Supervisor> {
        &self.supervisors
    }
}

impl<T, N> InfrastructureStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load the depot level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch depots.`.
    pub async fn fetch_depots(&self) -> Result<Vec<Depot>, StoreError> {
        self.load(&self.depots).await
    }

    /// Load the station level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch stations.`.
    pub async fn fetch_stations(&self) -> Result<Vec<Station>, StoreError> {
        self.load(&self.stations).await
    }

    /// Load the section level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch sections.`.
    pub async fn fetch_sections(&self) -> Result<Vec<Section>, StoreError> {
        self.load(&self.sections).await
    }

    /// Load the circuit level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch circuits.`.
    pub async fn fetch_circuits(&self) -> Result<Vec<Circuit>, StoreError> {
        self.load(&self.circuits).await
    }

    /// Load the supervisor level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch supervisors.`.
    pub async fn fetch_supervisors(&self) -> Result<Vec<Supervisor>, StoreError> {
        self.load(&self.supervisors).await
    }

    async fn load<E>(&self, level: &TreeLevel<E>) -> Result<Vec<E>, StoreError>
    where
        E: DeserializeOwned + Clone,
    {
        self.core
            .load_list(
                &level.activity,
                &level.items,
                ApiRequest::get(level.path),
                Failure::fixed(level.failure),
            )
            .await
    }
}
