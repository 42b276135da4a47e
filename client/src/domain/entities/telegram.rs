//! Telegram notification groups.

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// A Telegram chat receiving alerts, files or reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramGroup {
    /// Primary key.
    pub id: u64,
    /// Stable key (`alert`, `files`, `reports`).
    #[serde(default)]
    pub key: Option<String>,
    /// Display name.
    pub name: String,
    /// Telegram chat id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chat_id: String,
    /// Invitation link.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}

/// Update payload for [`TelegramGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TelegramGroupDraft {
    /// Display name.
    pub name: String,
    /// Telegram chat id.
    pub chat_id: String,
    /// Invitation link.
    pub link: String,
}
