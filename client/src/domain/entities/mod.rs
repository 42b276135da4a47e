//! Records mirrored from the REST API.
//!
//! Read types derive `Deserialize` and tolerate missing optional fields;
//! draft types derive `Serialize` and carry only what the API accepts on
//! write. Read-only decorations (`depot_display`, `equipment_count`) never
//! appear in drafts.

mod attachment;
mod circuit;
mod dashboard;
mod depot;
mod email;
mod failure;
mod failure_id;
mod movement;
mod report;
mod section;
mod station;
mod supervisor;
mod telegram;
mod user;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use attachment::Attachment;
pub use circuit::{Circuit, CircuitDraft, Severity};
pub use dashboard::{
    DashboardCharts, DashboardData, DashboardFilters, DashboardKpis, ResolvedPoint,
    SectionStatus,
};
pub use depot::{Depot, DepotDraft, Equipment, EquipmentDraft};
pub use email::{EmailSettings, EmailSettingsDraft, Encryption, RecipientKind, Recipients};
pub use failure::{
    EntryType, FailureDraft, FailureLog, FailureStatus, LogbookQuery, SortDirection,
};
pub use failure_id::{FailureIdSettings, FailureIdSettingsDraft};
pub use movement::{MovementDraft, SupervisorDay, SupervisorMovement};
pub use report::{Frequency, ReportSchedule, ReportScheduleDraft};
pub use section::{Asset, AssetDraft, Section, SectionDraft, SubSection, SubSectionDraft};
pub use station::{Station, StationDraft, StationEquipment, StationEquipmentDraft};
pub use supervisor::{Supervisor, SupervisorDraft};
pub use telegram::{TelegramGroup, TelegramGroupDraft};
pub use user::{User, UserDraft};

/// A related record rendered either as its primary key or as a label.
///
/// Failure list endpoints render relations with their string form while
/// write endpoints and most detail views use ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedRef {
    /// Primary key.
    Id(u64),
    /// Display label.
    Label(String),
}

impl RelatedRef {
    /// Primary key, when rendered as one.
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for RelatedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Accept `"2.50"`, `2.5` or `null` for decimal columns.
pub(crate) fn decimal_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Treat `null` like a missing string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
