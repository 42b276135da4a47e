//! Sections, sub-sections and their assets.

use serde::{Deserialize, Serialize};

use super::{decimal_text, null_as_empty};

/// A line section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning depot id.
    pub depot: u64,
    /// Owning depot name (read-only).
    #[serde(default)]
    pub depot_display: Option<String>,
    /// Owning depot code (read-only).
    #[serde(default)]
    pub depot_code: Option<String>,
    /// Sub-sections, when embedded.
    #[serde(default)]
    pub subsections: Vec<SubSection>,
}

/// Create/update payload for [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SectionDraft {
    /// Display name.
    pub name: String,
    /// Owning depot id.
    pub depot: u64,
}

/// A sub-section of a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubSection {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning section id; absent in tree views.
    #[serde(default)]
    pub section: Option<u64>,
    /// Assets, when embedded.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Create/update payload for [`SubSection`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SubSectionDraft {
    /// Display name.
    pub name: String,
    /// Owning section id.
    pub section: u64,
}

/// A maintained asset within a sub-section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Decimal quantity, kept as text to avoid rounding.
    #[serde(default, deserialize_with = "decimal_text")]
    pub quantity: Option<String>,
    /// Unit of `quantity`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit: String,
    /// Owning sub-section id.
    #[serde(default)]
    pub subsection: Option<u64>,
}

/// Create/update payload for [`Asset`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssetDraft {
    /// Display name.
    pub name: String,
    /// Decimal quantity as text.
    pub quantity: Option<String>,
    /// Unit of `quantity`.
    pub unit: String,
    /// Owning sub-section id.
    pub subsection: u64,
}
