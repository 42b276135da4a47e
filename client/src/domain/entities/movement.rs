//! Daily supervisor movements: where each supervisor is, or who covers
//! for them while on leave.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// One supervisor's movement record for a day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupervisorMovement {
    /// Primary key.
    pub id: u64,
    /// Day the record covers.
    pub date: NaiveDate,
    /// Supervisor id.
    pub supervisor: u64,
    /// Where the supervisor is working.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    /// Whether the supervisor is on leave.
    #[serde(default)]
    pub on_leave: bool,
    /// First day of leave.
    #[serde(default)]
    pub leave_from: Option<NaiveDate>,
    /// Last day of leave.
    #[serde(default)]
    pub leave_to: Option<NaiveDate>,
    /// Supervisor covering during leave.
    #[serde(default)]
    pub look_after: Option<u64>,
    /// Reason for the visit.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub purpose: String,
}

/// A supervisor row of the daily movement sheet.
///
/// Every supervisor is listed; `movement` is `None` until a record is saved
/// for the day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupervisorDay {
    /// Supervisor id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Job title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub designation: String,
    /// Depot code or name.
    #[serde(default)]
    pub depot_display: Option<String>,
    /// Record for the requested day.
    #[serde(default)]
    pub movement: Option<SupervisorMovement>,
}

/// Create/update payload for [`SupervisorMovement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementDraft {
    /// Day the record covers.
    pub date: NaiveDate,
    /// Supervisor id.
    pub supervisor: u64,
    /// Where the supervisor is working.
    pub location: String,
    /// Whether the supervisor is on leave.
    pub on_leave: bool,
    /// First day of leave.
    pub leave_from: Option<NaiveDate>,
    /// Last day of leave.
    pub leave_to: Option<NaiveDate>,
    /// Supervisor covering during leave.
    pub look_after: Option<u64>,
    /// Reason for the visit.
    pub purpose: String,
}

impl MovementDraft {
    /// An on-duty record at `location`.
    pub fn on_duty(date: NaiveDate, supervisor: u64, location: impl Into<String>) -> Self {
        Self {
            date,
            supervisor,
            location: location.into(),
            on_leave: false,
            leave_from: None,
            leave_to: None,
            look_after: None,
            purpose: String::new(),
        }
    }
}
