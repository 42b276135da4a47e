//! Files attached to failure logs.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use super::null_as_empty;

/// A photo or document uploaded against a failure log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Primary key.
    pub id: u64,
    /// Owning failure log id.
    #[serde(default)]
    pub failure: Option<u64>,
    /// Download URL of the stored file.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file: String,
    /// Free-text caption.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Upload time.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<FixedOffset>>,
}
