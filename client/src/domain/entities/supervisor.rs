//! Supervisors and their assignments.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A supervisor responsible for parts of the network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Supervisor {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning depot id.
    #[serde(default)]
    pub depot: Option<u64>,
    /// Owning depot name (read-only).
    #[serde(default)]
    pub depot_display: Option<String>,
    /// Job title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub designation: String,
    /// Mobile number.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mobile: String,
    /// Email address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Assigned station ids.
    #[serde(default)]
    pub stations: Vec<u64>,
    /// Assigned section ids.
    #[serde(default)]
    pub sections: Vec<u64>,
    /// Assigned sub-section ids.
    #[serde(default)]
    pub subsections: Vec<u64>,
    /// Assigned asset ids.
    #[serde(default)]
    pub assets: Vec<u64>,
    /// Assigned station equipment ids.
    #[serde(default)]
    pub station_equipments: Vec<u64>,
}

/// Create/update payload for [`Supervisor`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SupervisorDraft {
    /// Display name.
    pub name: String,
    /// Owning depot id.
    pub depot: Option<u64>,
    /// Job title.
    pub designation: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Assigned station ids.
    pub stations: Vec<u64>,
    /// Assigned section ids.
    pub sections: Vec<u64>,
    /// Assigned sub-section ids.
    pub subsections: Vec<u64>,
    /// Assigned asset ids.
    pub assets: Vec<u64>,
    /// Assigned station equipment ids.
    pub station_equipments: Vec<u64>,
}
