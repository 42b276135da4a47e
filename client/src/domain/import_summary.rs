//! Interpretation of spreadsheet import responses.
//!
//! Import endpoints answer with a message, optional per-row errors and,
//! on newer servers, explicit counters:
//!
//! ```json
//! {"message": "Import complete. Created: 4, Updated: 1, Skipped: 0.",
//!  "errors": ["Row 3: unknown depot", "Row 7: missing code"]}
//! ```
//!
//! The same document may arrive with a 2xx (including `207 Multi-Status`) or
//! a 4xx status; both paths go through [`ImportReport`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// How many row errors are quoted in a warning notice.
pub const QUOTED_ERROR_LIMIT: usize = 3;

const GENERIC_HEADLINE: &str = "Import complete.";

/// Decoded import response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportReport {
    /// Server summary sentence.
    #[serde(default)]
    pub message: Option<String>,
    /// Fatal error sentence (4xx bodies).
    #[serde(default)]
    pub error: Option<String>,
    /// Per-row problems.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub errors: Vec<String>,
    /// Rows read from the file.
    #[serde(default, alias = "processed_count", alias = "total")]
    pub processed: Option<u64>,
    /// Rows that created new records.
    #[serde(default, alias = "created_count")]
    pub created: Option<u64>,
    /// Rows that changed existing records.
    #[serde(default, alias = "updated_count")]
    pub updated: Option<u64>,
    /// Rows left untouched.
    #[serde(default, alias = "skipped_count")]
    pub skipped: Option<u64>,
    /// Rows rejected.
    #[serde(default, alias = "errors_count")]
    pub error_count: Option<u64>,
}

impl ImportReport {
    /// Decode a JSON response, tolerating unknown or missing keys.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            Value::String(message) => Self {
                message: Some(message.clone()),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Decode a raw (error) body.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Whether any row-level problems were reported.
    pub fn has_row_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Headline for the notice: counters when present, then the server's
    /// own message, then a generic sentence.
    pub fn headline(&self) -> String {
        let counters = [
            ("Processed", self.processed),
            ("Created", self.created),
            ("Updated", self.updated),
            ("Skipped", self.skipped),
            ("Errors", self.error_count),
        ]
        .into_iter()
        .filter_map(|(label, count)| count.map(|count| format!("{label}: {count}")))
        .collect::<Vec<_>>();
        if !counters.is_empty() {
            return format!("{GENERIC_HEADLINE} {}.", counters.join(", "));
        }
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(|| GENERIC_HEADLINE.to_owned(), str::to_owned)
    }

    /// Headline followed by the first few row errors.
    pub fn warning_message(&self) -> String {
        let quoted = self
            .errors
            .iter()
            .take(QUOTED_ERROR_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} First errors: {quoted}", self.headline())
    }

    /// Convert into the value returned to callers.
    pub fn into_outcome(self) -> ImportOutcome {
        let headline = self.headline();
        ImportOutcome {
            headline,
            errors: self.errors,
        }
    }
}

/// Result of a successful import call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Summary sentence shown to the user.
    pub headline: String,
    /// Rows the server rejected; empty for a clean import.
    pub errors: Vec<String>,
}

impl ImportOutcome {
    /// Whether some rows were rejected.
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(text)) => vec![text],
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counters_take_precedence_over_the_message() {
        let report = ImportReport::from_value(&json!({
            "message": "done",
            "created_count": 4,
            "updated": 1,
            "errors": []
        }));
        assert_eq!(report.headline(), "Import complete. Created: 4, Updated: 1.");
    }

    #[test]
    fn message_is_used_without_counters() {
        let report = ImportReport::from_value(&json!({"message": "Imported 3 stations."}));
        assert_eq!(report.headline(), "Imported 3 stations.");
        assert!(!report.has_row_errors());
    }

    #[test]
    fn generic_headline_when_nothing_is_reported() {
        assert_eq!(ImportReport::from_value(&Value::Null).headline(), GENERIC_HEADLINE);
    }

    #[test]
    fn warning_quotes_at_most_three_errors() {
        let report = ImportReport::from_value(&json!({
            "message": "Partial import.",
            "errors": ["row 3 bad", "row 7 bad", "row 9 bad", "row 11 bad"]
        }));
        let message = report.warning_message();
        assert_eq!(
            message,
            "Partial import. First errors: row 3 bad, row 7 bad, row 9 bad"
        );
    }

    #[test]
    fn non_string_errors_are_rendered_as_json() {
        let report = ImportReport::from_body(r#"{"errors": [{"row": 2}], "error": "Bad sheet"}"#);
        assert_eq!(report.errors, vec![r#"{"row":2}"#.to_owned()]);
        assert_eq!(report.headline(), "Bad sheet");
    }
}
