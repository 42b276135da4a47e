//! Dashboard KPIs and charts.

use std::sync::Arc;

use crate::domain::ports::{ApiRequest, Notifier, Transport};
use crate::domain::store::{Activity, Failure, StoreCore, SyncSlot, decode_entity};
use crate::domain::{DashboardData, DashboardFilters, StoreError};

const DASHBOARD_PATH: &str = "dashboard/data/";
const FETCH_FAILED: &str = "Failed to fetch dashboard data.";

/// Latest dashboard payload for the selected filters.
pub struct DashboardStore<T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    data: SyncSlot<Option<DashboardData>>,
}

impl<T: ?Sized, N: ?Sized> DashboardStore<T, N> {
    /// Create the store with injected transport and notifier.
    pub fn new(transport: Arc<T>, notifier: Arc<N>) -> Self {
        Self {
            core: StoreCore::new(transport, notifier),
            activity: Activity::default(),
            data: SyncSlot::new(None),
        }
    }

    /// Payload from the latest response.
    pub fn data(&self) -> Option<DashboardData> {
        self.data.get()
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

impl<T, N> DashboardStore<T, N>
where
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Load KPIs and chart series.
    ///
    /// Changing filters quickly is safe: only the newest request may
    /// replace the payload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with `Failed to fetch dashboard data.`.
    pub async fn fetch(&self, filters: &DashboardFilters) -> Result<DashboardData, StoreError> {
        let mut request = ApiRequest::get(DASHBOARD_PATH);
        request.query = filters.to_query();
        let loaded = self
            .core
            .load(
                &self.activity,
                &self.data,
                request,
                Failure::fixed(FETCH_FAILED),
                |response| decode_entity(response, FETCH_FAILED).map(Some),
            )
            .await?;
        loaded.ok_or_else(|| StoreError::decode(FETCH_FAILED))
    }
}
