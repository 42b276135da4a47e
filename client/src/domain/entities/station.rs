//! Stations and their equipment.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    /// Primary key.
    pub id: u64,
    /// Owning depot id.
    pub depot: u64,
    /// Owning depot name (read-only).
    #[serde(default)]
    pub depot_display: Option<String>,
    /// Display name.
    pub name: String,
    /// Unique station code.
    pub code: String,
    /// Free-text category.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Installed equipment.
    #[serde(default)]
    pub equipments: Vec<StationEquipment>,
    /// Server-side count of `equipments`.
    #[serde(default)]
    pub equipment_count: Option<u64>,
}

/// Create/update payload for [`Station`].
///
/// Nested equipment is managed through its own endpoint and never sent here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StationDraft {
    /// Owning depot id.
    pub depot: u64,
    /// Display name.
    pub name: String,
    /// Unique station code.
    pub code: String,
    /// Free-text category.
    pub category: String,
}

impl From<&Station> for StationDraft {
    fn from(station: &Station) -> Self {
        Self {
            depot: station.depot,
            name: station.name.clone(),
            code: station.code.clone(),
            category: station.category.clone(),
        }
    }
}

/// Equipment installed at a station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationEquipment {
    /// Primary key.
    pub id: u64,
    /// Owning station id.
    pub station: u64,
    /// Free-text category.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Equipment name.
    pub name: String,
    /// Make and model.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub make_modal: String,
    /// Address, e.g. an IP address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    /// Physical location in the station.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location_in_station: String,
    /// Units installed.
    #[serde(default = "one")]
    pub quantity: u32,
}

/// Create/update payload for [`StationEquipment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationEquipmentDraft {
    /// Owning station id.
    pub station: u64,
    /// Free-text category.
    pub category: String,
    /// Equipment name.
    pub name: String,
    /// Make and model.
    pub make_modal: String,
    /// Address, e.g. an IP address.
    pub address: String,
    /// Physical location in the station.
    pub location_in_station: String,
    /// Units installed.
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drafts_drop_read_only_fields() {
        let station: Station = serde_json::from_value(json!({
            "id": 9,
            "depot": 2,
            "depot_display": "North",
            "name": "Central",
            "code": "CEN",
            "category": null,
            "equipments": [{"id": 1, "station": 9, "name": "Relay"}],
            "equipment_count": 1
        }))
        .expect("station decodes");
        assert_eq!(station.equipments[0].quantity, 1);

        let draft = serde_json::to_value(StationDraft::from(&station)).expect("serialises");
        assert_eq!(
            draft,
            json!({"depot": 2, "name": "Central", "code": "CEN", "category": ""})
        );
    }
}
