//! Format of server-generated failure identifiers (`RF-0042`).

use serde::{Deserialize, Serialize};

const DEFAULT_PREFIX: &str = "RF";
const DEFAULT_PADDING: u8 = 4;
const DEFAULT_RESET_CYCLE: &str = "yearly";

/// Prefix, zero padding and counter reset cycle for failure ids.
///
/// The server keeps a single row; until it has been loaded the client
/// assumes the stock format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FailureIdSettings {
    /// Primary key of the singleton row.
    #[serde(default)]
    pub id: Option<u64>,
    /// Leading letters.
    pub prefix: String,
    /// Digits in the counter.
    #[serde(alias = "padding_digits")]
    pub padding: u8,
    /// When the counter restarts, e.g. `yearly`.
    pub reset_cycle: String,
}

impl Default for FailureIdSettings {
    fn default() -> Self {
        Self {
            id: None,
            prefix: DEFAULT_PREFIX.to_owned(),
            padding: DEFAULT_PADDING,
            reset_cycle: DEFAULT_RESET_CYCLE.to_owned(),
        }
    }
}

impl FailureIdSettings {
    /// Render the identifier for counter value `sequence`.
    pub fn format(&self, sequence: u64) -> String {
        format!(
            "{}-{sequence:0width$}",
            self.prefix,
            width = usize::from(self.padding)
        )
    }
}

/// Update payload for [`FailureIdSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureIdSettingsDraft {
    /// Leading letters.
    pub prefix: String,
    /// Digits in the counter.
    pub padding: u8,
    /// When the counter restarts.
    pub reset_cycle: String,
}

impl From<&FailureIdSettings> for FailureIdSettingsDraft {
    fn from(settings: &FailureIdSettings) -> Self {
        Self {
            prefix: settings.prefix.clone(),
            padding: settings.padding,
            reset_cycle: settings.reset_cycle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"id": 1, "prefix": "SF", "padding": 5, "reset_cycle": "monthly"}), 5)]
    #[case(json!({"prefix": "SF", "padding_digits": 3, "reset_cycle": "never"}), 3)]
    fn padding_decodes_under_either_name(#[case] body: serde_json::Value, #[case] padding: u8) {
        let settings: FailureIdSettings = serde_json::from_value(body).expect("decodes");
        assert_eq!(settings.padding, padding);
    }

    #[test]
    fn identifiers_are_zero_padded() {
        assert_eq!(FailureIdSettings::default().format(42), "RF-0042");
    }
}
