//! Scheduled reports.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// How often a report is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    #[default]
    Daily,
    /// Once a week on `day_of_week`.
    Weekly,
    /// Once a month on `day_of_month`.
    Monthly,
}

/// A report delivery schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportSchedule {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Template URL, once uploaded.
    #[serde(default)]
    pub template: Option<String>,
    /// Template file name (read-only).
    #[serde(default)]
    pub template_name: Option<String>,
    /// Delivery cadence.
    #[serde(default)]
    pub frequency: Frequency,
    /// Three-letter weekday (`Mon`..`Sun`).
    #[serde(default)]
    pub day_of_week: Option<String>,
    /// Day of month for monthly reports.
    #[serde(default)]
    pub day_of_month: Option<u8>,
    /// Local send time.
    pub time: NaiveTime,
    /// Deliver by email.
    #[serde(default)]
    pub send_email: bool,
    /// Deliver to Telegram.
    #[serde(default)]
    pub send_telegram: bool,
    /// Telegram group keys receiving the report.
    #[serde(default)]
    pub telegram_group_keys: Vec<String>,
}

/// Create/update payload for [`ReportSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportScheduleDraft {
    /// Display name.
    pub name: String,
    /// Delivery cadence.
    pub frequency: Frequency,
    /// Three-letter weekday.
    pub day_of_week: String,
    /// Day of month.
    pub day_of_month: u8,
    /// Local send time.
    pub time: NaiveTime,
    /// Deliver by email.
    pub send_email: bool,
    /// Deliver to Telegram.
    pub send_telegram: bool,
    /// Telegram group keys receiving the report.
    pub telegram_group_keys: Vec<String>,
}
