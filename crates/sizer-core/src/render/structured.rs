//! Structured (JSON) report output, for callers that want to parse results rather than
//! read a table.

use serde::Serialize;

use super::Report;

#[derive(Debug, Serialize)]
pub struct StructuredMetric {
    pub name: &'static str,
    pub value: u64,
    pub level_of_concern: u8,
    pub overflow: bool,
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StructuredReport {
    pub metrics: Vec<StructuredMetric>,
}

impl From<&Report> for StructuredReport {
    fn from(report: &Report) -> Self {
        StructuredReport {
            metrics: report
                .metrics
                .iter()
                .map(|m| StructuredMetric {
                    name: m.name,
                    value: m.value,
                    level_of_concern: m.level_of_concern,
                    overflow: m.overflow,
                    path: m.path.clone(),
                })
                .collect(),
        }
    }
}

impl StructuredReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Metric;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_to_valid_json() {
        let report = Report {
            metrics: vec![Metric {
                name: "max blob size",
                value: 42,
                display: "42 B".into(),
                level_of_concern: 0,
                overflow: false,
                footnote: None,
                path: None,
            }],
        };
        let structured = StructuredReport::from(&report);
        let json = structured.to_json().unwrap();
        assert!(json.contains("\"max blob size\""));
        assert!(json.contains("42"));
    }
}
