//! One store per backend resource.
//!
//! Stores are plain service objects: construct them with an injected
//! transport and notifier (see `crate::context::StoreContext`) and share
//! them behind `Arc`.

mod attachments;
mod auth;
mod circuits;
mod dashboard;
mod depots;
mod email;
mod failure_id_settings;
mod failures;
mod infrastructure;
mod logbook;
mod movements;
mod recent_failures;
mod reports;
mod sections;
mod stations;
mod supervisors;
mod telegram;
mod users;

pub use attachments::AttachmentStore;
pub use auth::AuthStore;
pub use circuits::{CircuitStore, Circuits};
pub use dashboard::DashboardStore;
pub use depots::{DepotEquipment, DepotStore, Depots};
pub use email::EmailSettingsStore;
pub use failure_id_settings::FailureIdSettingsStore;
pub use failures::{FailureStore, Failures};
pub use infrastructure::{InfrastructureStore, TreeLevel};
pub use logbook::LogbookStore;
pub use movements::{MovementSheet, MovementStore};
pub use recent_failures::RecentFailuresStore;
pub use reports::{ReportStore, Reports, TEMPLATE_FIELD};
pub use sections::{Assets, SectionStore, Sections, SubSections};
pub use stations::{StationEquipments, StationStore, Stations};
pub use supervisors::{SupervisorStore, Supervisors};
pub use telegram::{TelegramGroups, TelegramStore};
pub use users::{UserStore, Users};
