//! Track circuits.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// Failure severity, shared by circuits and failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    /// Default grade.
    #[default]
    Minor,
    /// Service-affecting.
    Major,
    /// Safety-relevant.
    Critical,
}

/// A track circuit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Circuit {
    /// Primary key.
    pub id: u64,
    /// Business identifier, unique across circuits.
    pub circuit_id: String,
    /// Display name.
    pub name: String,
    /// Free-text equipment reference.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub related_equipment: String,
    /// Default severity for failures on this circuit.
    #[serde(default)]
    pub severity: Severity,
    /// Notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: String,
}

/// Create/update payload for [`Circuit`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CircuitDraft {
    /// Business identifier.
    pub circuit_id: String,
    /// Display name.
    pub name: String,
    /// Free-text equipment reference.
    pub related_equipment: String,
    /// Default severity.
    pub severity: Severity,
    /// Notes.
    pub details: String,
}
