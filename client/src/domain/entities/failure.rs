//! Failure logs and logbook queries.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{RelatedRef, Severity, null_as_empty};

/// Kind of logbook entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Equipment failure.
    #[default]
    Item,
    /// Informational message.
    Message,
    /// Warning.
    Warning,
    /// Major incident.
    Major,
    /// Critical incident.
    Critical,
}

/// Lifecycle of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FailureStatus {
    /// Open and unattended.
    #[default]
    Active,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Closed.
    Resolved,
    /// Parked.
    #[serde(rename = "On Hold")]
    OnHold,
}

/// A failure log entry.
///
/// List endpoints render relations as labels, detail endpoints as ids; both
/// decode into [`RelatedRef`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FailureLog {
    /// Primary key.
    pub id: u64,
    /// Server-generated failure identifier.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fail_id: String,
    /// Entry kind.
    #[serde(default)]
    pub entry_type: EntryType,
    /// Severity.
    #[serde(default)]
    pub severity: Severity,
    /// Lifecycle state.
    #[serde(default)]
    pub current_status: FailureStatus,
    /// Affected circuit.
    #[serde(default)]
    pub circuit: Option<RelatedRef>,
    /// Affected station.
    #[serde(default)]
    pub station: Option<RelatedRef>,
    /// Affected section.
    #[serde(default)]
    pub section: Option<RelatedRef>,
    /// Affected sub-section.
    #[serde(default)]
    pub sub_section: Option<RelatedRef>,
    /// Supervisor in charge.
    #[serde(default)]
    pub assigned_to: Option<RelatedRef>,
    /// When the failure was reported.
    pub reported_at: DateTime<FixedOffset>,
    /// When it was resolved.
    #[serde(default)]
    pub resolved_at: Option<DateTime<FixedOffset>>,
    /// Initial notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remark_fail: String,
    /// Resolution notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remark_right: String,
    /// Whether the entry was archived.
    #[serde(default)]
    pub is_archived: bool,
}

/// Create/update payload for [`FailureLog`]. `fail_id` is assigned by the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDraft {
    /// Entry kind.
    pub entry_type: EntryType,
    /// Severity.
    pub severity: Severity,
    /// Lifecycle state.
    pub current_status: FailureStatus,
    /// Affected circuit id.
    pub circuit: u64,
    /// Affected station id.
    pub station: Option<u64>,
    /// Affected section id.
    pub section: Option<u64>,
    /// Affected sub-section id.
    pub sub_section: Option<u64>,
    /// Supervisor id.
    pub assigned_to: Option<u64>,
    /// When the failure was reported.
    pub reported_at: DateTime<FixedOffset>,
    /// When it was resolved.
    pub resolved_at: Option<DateTime<FixedOffset>>,
    /// Initial notes.
    pub remark_fail: String,
    /// Resolution notes.
    pub remark_right: String,
}

/// Sort direction for logbook pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters and paging for the logbook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogbookQuery {
    /// Free-text search.
    pub query: Option<String>,
    /// Circuit ids.
    pub circuits: Vec<u64>,
    /// Section ids.
    pub sections: Vec<u64>,
    /// Station ids.
    pub stations: Vec<u64>,
    /// Supervisor ids.
    pub supervisors: Vec<u64>,
    /// Status filter.
    pub statuses: Vec<FailureStatus>,
    /// Inclusive lower bound on the report date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the report date.
    pub date_to: Option<NaiveDate>,
    /// Field to sort by.
    pub sort_key: Option<String>,
    /// Sort direction.
    pub sort_dir: Option<SortDirection>,
    /// One-based page number.
    pub page: Option<u32>,
    /// Rows per page.
    pub rows_per_page: Option<u32>,
}

impl LogbookQuery {
    /// Encode as query parameters; list filters repeat their `key[]`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            params.push(("query".to_owned(), query.to_owned()));
        }
        push_ids(&mut params, "circuits[]", &self.circuits);
        push_ids(&mut params, "sections[]", &self.sections);
        push_ids(&mut params, "stations[]", &self.stations);
        push_ids(&mut params, "supervisors[]", &self.supervisors);
        for status in &self.statuses {
            params.push(("statuses[]".to_owned(), status_label(*status).to_owned()));
        }
        if let Some(date) = self.date_from {
            params.push(("date_from".to_owned(), date.to_string()));
        }
        if let Some(date) = self.date_to {
            params.push(("date_to".to_owned(), date.to_string()));
        }
        if let Some(key) = &self.sort_key {
            params.push(("sortKey".to_owned(), key.clone()));
        }
        if let Some(direction) = self.sort_dir {
            params.push(("sortDir".to_owned(), direction.as_str().to_owned()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_owned(), page.to_string()));
        }
        if let Some(rows) = self.rows_per_page {
            params.push(("rowsPerPage".to_owned(), rows.to_string()));
        }
        params
    }
}

fn push_ids(params: &mut Vec<(String, String)>, key: &str, ids: &[u64]) {
    params.extend(ids.iter().map(|id| (key.to_owned(), id.to_string())));
}

fn status_label(status: FailureStatus) -> &'static str {
    match status {
        FailureStatus::Active => "Active",
        FailureStatus::InProgress => "In Progress",
        FailureStatus::Resolved => "Resolved",
        FailureStatus::OnHold => "On Hold",
    }
}
