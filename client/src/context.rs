//! Explicit wiring of every store to one transport and one notifier.
//!
//! There is no global registry: callers build a [`StoreContext`] once and
//! pass references where they are needed.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::store::IMPORT_WARNING_TTL;
use crate::domain::stores::{
    AttachmentStore, CircuitStore, DashboardStore, DepotStore, EmailSettingsStore,
    FailureIdSettingsStore, FailureStore, InfrastructureStore, LogbookStore, MovementStore,
    RecentFailuresStore, ReportStore, SectionStore, StationStore, SupervisorStore,
    TelegramStore, UserStore,
};

/// All resource stores sharing one transport and notifier.
pub struct StoreContext<T: ?Sized, N: ?Sized> {
    /// Depots and depot equipment.
    pub depots: DepotStore<T, N>,
    /// Track circuits.
    pub circuits: CircuitStore<T, N>,
    /// Stations and station equipment.
    pub stations: StationStore<T, N>,
    /// Sections, sub-sections and assets.
    pub sections: SectionStore<T, N>,
    /// Maintenance supervisors.
    pub supervisors: SupervisorStore<T, N>,
    /// Failure logs and the archive.
    pub failures: FailureStore<T, N>,
    /// Files attached to failure logs.
    pub attachments: AttachmentStore<T, N>,
    /// Failure identifier format.
    pub failure_id_settings: FailureIdSettingsStore<T, N>,
    /// Daily supervisor movements.
    pub movements: MovementStore<T, N>,
    /// Report schedules.
    pub reports: ReportStore<T, N>,
    /// User accounts.
    pub users: UserStore<T, N>,
    /// Telegram groups.
    pub telegram: TelegramStore<T, N>,
    /// Outgoing mail settings.
    pub email: EmailSettingsStore<T, N>,
    /// Read-only infrastructure tree.
    pub infrastructure: InfrastructureStore<T, N>,
    /// Dashboard KPIs and charts.
    pub dashboard: DashboardStore<T, N>,
    /// Paginated failure logbook.
    pub logbook: LogbookStore<T, N>,
    /// Latest failures feed.
    pub recent_failures: RecentFailuresStore<T, N>,
}

impl<T: ?Sized, N: ?Sized> StoreContext<T, N> {
    /// Build every store with the default import warning lifetime.
    pub fn new(transport: &Arc<T>, notifier: &Arc<N>) -> Self {
        Self::with_warning_ttl(transport, notifier, IMPORT_WARNING_TTL)
    }

    /// Build every store, keeping import warnings queued for `warning_ttl`.
    pub fn with_warning_ttl(transport: &Arc<T>, notifier: &Arc<N>, warning_ttl: Duration) -> Self {
        let t = || Arc::clone(transport);
        let n = || Arc::clone(notifier);
        Self {
            depots: DepotStore::new(t(), n()).with_warning_ttl(warning_ttl),
            circuits: CircuitStore::new(t(), n()).with_warning_ttl(warning_ttl),
            stations: StationStore::new(t(), n()).with_warning_ttl(warning_ttl),
            sections: SectionStore::new(t(), n()).with_warning_ttl(warning_ttl),
            supervisors: SupervisorStore::new(t(), n()).with_warning_ttl(warning_ttl),
            failures: FailureStore::new(t(), n()),
            attachments: AttachmentStore::new(t(), n()),
            failure_id_settings: FailureIdSettingsStore::new(t(), n()),
            movements: MovementStore::new(t(), n()),
            reports: ReportStore::new(t(), n()),
            users: UserStore::new(t(), n()),
            telegram: TelegramStore::new(t(), n()),
            email: EmailSettingsStore::new(t(), n()),
            infrastructure: InfrastructureStore::new(t(), n()),
            dashboard: DashboardStore::new(t(), n()),
            logbook: LogbookStore::new(t(), n()),
            recent_failures: RecentFailuresStore::new(t(), n()),
        }
    }
}
