//! Typed view over server error payloads.
//!
//! The API answers validation failures with field-keyed documents
//! (`{"name": ["This field is required."]}`), action failures with a single
//! message (`{"error": "..."}`, `{"detail": "..."}`), and occasionally with
//! plain text or HTML. [`ErrorShape::parse`] recognises the first two and
//! keeps the rest as a compact raw preview.

use serde_json::{Map, Value};

const PREVIEW_CHAR_LIMIT: usize = 160;
const MESSAGE_KEYS: [&str; 3] = ["detail", "error", "message"];
const NON_FIELD_KEY: &str = "non_field_errors";

/// Messages reported against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted field path (`code`, `equipments[0].name`, `non_field_errors`).
    pub field: String,
    /// Messages in server order.
    pub messages: Vec<String>,
}

/// Recognised structure of an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorShape {
    /// Field-keyed validation errors.
    Fields(Vec<FieldError>),
    /// A single human-readable message.
    Detail(String),
    /// Anything else, compacted and truncated.
    Raw(String),
}

impl ErrorShape {
    /// Parse a response body.
    ///
    /// # Examples
    /// ```
    /// use rfms_client::domain::ErrorShape;
    ///
    /// let shape = ErrorShape::parse(r#"{"name": ["required"]}"#);
    /// assert_eq!(shape.summary(), "name: required");
    /// ```
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value).unwrap_or_else(|| Self::Raw(body_preview(body))),
            Err(_) => Self::Raw(body_preview(body)),
        }
    }

    /// Recognise a decoded JSON document; `None` when it has no usable shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(message) if !message.trim().is_empty() => {
                Some(Self::Detail(message.trim().to_owned()))
            }
            Value::Object(map) => detail_message(map)
                .map(Self::Detail)
                .or_else(|| field_errors(map).map(Self::Fields)),
            Value::Array(items) => {
                let messages = scalar_messages(items)?;
                (!messages.is_empty()).then(|| Self::Detail(messages.join("; ")))
            }
            _ => None,
        }
    }

    /// Whether the payload was understood well enough to show verbatim.
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Raw(_))
    }

    /// Human-readable rendering.
    ///
    /// Field errors render as `field: message, message` joined with `; `;
    /// non-field errors drop the prefix.
    pub fn summary(&self) -> String {
        match self {
            Self::Fields(fields) => fields
                .iter()
                .map(|entry| {
                    let messages = entry.messages.join(", ");
                    if entry.field == NON_FIELD_KEY || entry.field.is_empty() {
                        messages
                    } else {
                        format!("{}: {messages}", entry.field)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
            Self::Detail(message) | Self::Raw(message) => message.clone(),
        }
    }

    /// Field entry by path.
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        match self {
            Self::Fields(fields) => fields.iter().find(|entry| entry.field == name),
            Self::Detail(_) | Self::Raw(_) => None,
        }
    }
}

fn detail_message(map: &Map<String, Value>) -> Option<String> {
    MESSAGE_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::String(message)) if !message.trim().is_empty() => {
            Some(message.trim().to_owned())
        }
        _ => None,
    })
}

fn field_errors(map: &Map<String, Value>) -> Option<Vec<FieldError>> {
    let mut fields: Vec<FieldError> = Vec::new();
    for (key, value) in map {
        collect(key.clone(), value, &mut fields);
    }
    (!fields.is_empty()).then_some(fields)
}

fn collect(path: String, value: &Value, out: &mut Vec<FieldError>) {
    match value {
        Value::Null => {}
        Value::String(message) => push_message(out, path, message.clone()),
        Value::Bool(_) | Value::Number(_) => push_message(out, path, value.to_string()),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        collect(format!("{path}[{index}]"), item, out);
                    }
                    _ => collect(path.clone(), item, out),
                }
            }
        }
        Value::Object(nested) => {
            for (key, item) in nested {
                collect(format!("{path}.{key}"), item, out);
            }
        }
    }
}

fn push_message(out: &mut Vec<FieldError>, field: String, message: String) {
    match out.iter_mut().find(|entry| entry.field == field) {
        Some(entry) => entry.messages.push(message),
        None => out.push(FieldError {
            field,
            messages: vec![message],
        }),
    }
}

fn scalar_messages(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Value::String(message) => Some(message.clone()),
            Value::Bool(_) | Value::Number(_) => Some(item.to_string()),
            _ => None,
        })
        .collect()
}

/// Collapse whitespace and truncate `body` for log lines and raw messages.
pub fn body_preview(body: &str) -> String {
    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
