//! Depots and the measuring equipment they hold.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A maintenance depot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Depot {
    /// Primary key.
    pub id: u64,
    /// Unique name.
    pub name: String,
    /// Optional short code.
    #[serde(default)]
    pub code: Option<String>,
    /// Free-text location.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    /// Equipment held at the depot.
    #[serde(default)]
    pub equipments: Vec<Equipment>,
    /// Server-side count of `equipments`.
    #[serde(default)]
    pub equipment_count: Option<u64>,
}

/// Create/update payload for [`Depot`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DepotDraft {
    /// Unique name.
    pub name: String,
    /// Optional short code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Free-text location.
    pub location: String,
}

/// A piece of measuring equipment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Equipment {
    /// Primary key.
    pub id: u64,
    /// Owning depot.
    pub depot: u64,
    /// Equipment name.
    pub name: String,
    /// Model or type.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model_type: String,
    /// Asset or serial id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub asset_id: String,
    /// Location within the depot.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location_in_depot: String,
    /// Notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    /// Units held.
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Create/update payload for [`Equipment`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EquipmentDraft {
    /// Owning depot.
    pub depot: u64,
    /// Equipment name.
    pub name: String,
    /// Model or type.
    pub model_type: String,
    /// Asset or serial id.
    pub asset_id: String,
    /// Location within the depot.
    pub location_in_depot: String,
    /// Notes.
    pub notes: String,
    /// Units held.
    pub quantity: Option<u32>,
}
