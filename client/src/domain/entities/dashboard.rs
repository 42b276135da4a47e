//! Dashboard KPIs and chart series.

use chrono::NaiveDate;
use serde::Deserialize;

use super::null_as_empty;

/// Dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardFilters {
    /// Range key such as `7d` or `30d`; the server defaults to `30d`.
    pub range: Option<String>,
    /// Restrict to these section ids.
    pub sections: Vec<u64>,
}

impl DashboardFilters {
    /// Encode as query parameters (`range`, repeated `sections[]`).
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(range) = self.range.as_deref().filter(|range| !range.is_empty()) {
            params.push(("range".to_owned(), range.to_owned()));
        }
        params.extend(
            self.sections
                .iter()
                .map(|id| ("sections[]".to_owned(), id.to_string())),
        );
        params
    }
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DashboardKpis {
    /// Failures still open.
    #[serde(default)]
    pub active_failures: u64,
    /// Failures resolved within the range.
    #[serde(default)]
    pub resolved_in_range: u64,
    /// Mean resolution time, pre-formatted (`3h 20m`).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub avg_resolution_time: String,
    /// Open critical failures.
    #[serde(default)]
    pub critical_alerts: u64,
}

/// Active/resolved split for one section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionStatus {
    /// Section name; `None` for failures without a section.
    #[serde(rename = "section__name", default)]
    pub section_name: Option<String>,
    /// Open failures.
    #[serde(default)]
    pub active: u64,
    /// Resolved failures.
    #[serde(default)]
    pub resolved: u64,
}

/// Resolutions per day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedPoint {
    /// Day.
    pub date: NaiveDate,
    /// Failures resolved that day.
    pub count: u64,
}

/// Chart series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DashboardCharts {
    /// Status by section.
    #[serde(default)]
    pub status_by_section: Vec<SectionStatus>,
    /// Resolutions over time.
    #[serde(default)]
    pub resolved_over_time: Vec<ResolvedPoint>,
}

/// Payload of the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DashboardData {
    /// Headline numbers.
    #[serde(default)]
    pub kpis: DashboardKpis,
    /// Chart series.
    #[serde(default)]
    pub charts: DashboardCharts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_repeat_section_ids() {
        let filters = DashboardFilters {
            range: Some("7d".to_owned()),
            sections: vec![3, 5],
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("range".to_owned(), "7d".to_owned()),
                ("sections[]".to_owned(), "3".to_owned()),
                ("sections[]".to_owned(), "5".to_owned()),
            ]
        );
    }

    #[test]
    fn payload_decodes() {
        let data: DashboardData = serde_json::from_value(json!({
            "kpis": {"active_failures": 4, "resolved_in_range": 9,
                     "avg_resolution_time": "2h 5m", "critical_alerts": 1},
            "charts": {
                "status_by_section": [{"section__name": null, "active": 2, "resolved": 0}],
                "resolved_over_time": [{"date": "2024-05-01", "count": 3}]
            }
        }))
        .expect("dashboard decodes");
        assert_eq!(data.kpis.critical_alerts, 1);
        assert!(data.charts.status_by_section[0].section_name.is_none());
        assert_eq!(data.charts.resolved_over_time[0].count, 3);
    }
}
