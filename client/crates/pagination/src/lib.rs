//! Envelope primitives for REST collection endpoints.
//!
//! Collection endpoints answer with either a bare JSON array or a paginated
//! object of the form `{"count": n, "results": [...]}`. [`ListEnvelope`]
//! accepts both shapes and always yields the items in server order, preferring
//! the paginated shape when the payload is an object.
//!
//! [`Page`] models the explicit page envelope used by search endpoints that
//! also report the total page count.

use serde::{Deserialize, Serialize};

/// Either a paginated `{count, results}` object or a bare array.
///
/// # Examples
/// ```
/// use pagination::ListEnvelope;
///
/// let paged: ListEnvelope<u32> =
///     serde_json::from_str(r#"{"count": 2, "results": [7, 9]}"#).unwrap();
/// assert_eq!(paged.into_items(), vec![7, 9]);
///
/// let bare: ListEnvelope<u32> = serde_json::from_str("[7, 9]").unwrap();
/// assert_eq!(bare.into_items(), vec![7, 9]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    /// Object envelope carrying the items under `results`.
    Paginated {
        /// Total number of items across all pages, when reported.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u64>,
        /// Absolute URL of the next page, when any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next: Option<String>,
        /// Absolute URL of the previous page, when any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous: Option<String>,
        /// Items on this page in server order.
        results: Vec<T>,
    },
    /// Bare JSON array.
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    /// Consume the envelope and return its items in server order.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results, .. } => results,
            Self::Bare(items) => items,
        }
    }

    /// Total item count reported by the server, or the item count of a bare
    /// array.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Paginated {
                count: Some(count), ..
            } => *count,
            Self::Paginated { results, .. } => u64::try_from(results.len()).unwrap_or(u64::MAX),
            Self::Bare(items) => u64::try_from(items.len()).unwrap_or(u64::MAX),
        }
    }
}

impl<T> From<Vec<T>> for ListEnvelope<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Bare(items)
    }
}

/// Page envelope with an explicit page count.
///
/// ## Invariants
/// - `num_pages` is at least 1 once decoded; servers report an empty result
///   set as a single empty page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages.
    #[serde(default)]
    pub count: u64,
    /// Number of pages available for the current query.
    #[serde(default = "first_page", deserialize_with = "at_least_one")]
    pub num_pages: u64,
    /// Items on this page in server order.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            num_pages: first_page(),
            results: Vec::new(),
        }
    }
}

const fn first_page() -> u64 {
    1
}

fn at_least_one<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = u64::deserialize(deserializer)?;
    Ok(raw.max(first_page()))
}

#[cfg(test)]
mod tests {
    //! Envelope decoding coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::paginated(r#"{"count": 3, "results": ["a", "b", "c"]}"#)]
    #[case::paginated_without_count(r#"{"results": ["a", "b", "c"]}"#)]
    #[case::bare(r#"["a", "b", "c"]"#)]
    fn list_envelope_preserves_server_order(#[case] body: &str) {
        let envelope: ListEnvelope<String> =
            serde_json::from_str(body).expect("envelope should decode");
        assert_eq!(envelope.into_items(), vec!["a", "b", "c"]);
    }

    #[test]
    fn total_prefers_reported_count() {
        let envelope: ListEnvelope<u8> =
            serde_json::from_str(r#"{"count": 40, "results": [1, 2]}"#).expect("decode");
        assert_eq!(envelope.total(), 40);
    }

    #[test]
    fn object_without_results_is_rejected() {
        let decoded = serde_json::from_str::<ListEnvelope<u8>>(r#"{"count": 1}"#);
        assert!(decoded.is_err(), "an object must carry results");
    }

    #[test]
    fn page_clamps_zero_page_count() {
        let page: Page<u8> =
            serde_json::from_str(r#"{"count": 0, "num_pages": 0, "results": []}"#)
                .expect("page should decode");
        assert_eq!(page.num_pages, 1);
        assert!(page.results.is_empty());
    }
}
