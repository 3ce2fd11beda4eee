//! ASCII table rendering, grounded on the teacher's `cmd_summarize` use of
//! `prettytable`'s `Table`/`FormatBuilder`/`row!` for its own summary table.

use prettytable::{format, row, Table};

use super::Report;

/// Collects footnote strings as they're referenced, deduplicating so that two metrics
/// sharing the same cautionary note only print it once, each occurrence replaced by a
/// marker (`[1]`, `[2]`, ...) in insertion order.
#[derive(Default)]
struct FootnotePool {
    seen: Vec<String>,
}

impl FootnotePool {
    fn marker_for(&mut self, text: &str) -> usize {
        if let Some(pos) = self.seen.iter().position(|t| t == text) {
            return pos + 1;
        }
        self.seen.push(text.to_string());
        self.seen.len()
    }
}

/// Render `report` as an ASCII table, keeping only metrics whose level of concern is
/// at least `min_level` (`0` keeps everything). Footnotes referenced by the kept rows
/// are appended below the table, each printed once.
pub fn render_table(report: &Report, min_level: u8) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(row!["metric", "value", "level of concern"]);

    let mut footnotes = FootnotePool::default();
    let mut any_rows = false;

    for metric in &report.metrics {
        if metric.level_of_concern < min_level {
            continue;
        }
        any_rows = true;
        let concern = if metric.overflow {
            "!".repeat(super::MAX_LEVEL_OF_CONCERN as usize)
        } else {
            "*".repeat(metric.level_of_concern as usize)
        };
        let note = match (&metric.footnote, &metric.path) {
            (Some(note), Some(path)) => Some(format!("{note} ({path})")),
            (Some(note), None) => Some(note.clone()),
            (None, Some(path)) => Some(path.clone()),
            (None, None) => None,
        };
        let concern_cell = match note {
            Some(text) if metric.level_of_concern > 0 => {
                format!("{concern} [{}]", footnotes.marker_for(&text))
            }
            _ => concern,
        };
        table.add_row(row![metric.name, metric.display, concern_cell]);
    }

    let mut out = if any_rows {
        table.to_string()
    } else {
        String::from("No problems above the current threshold were found\n")
    };

    if !footnotes.seen.is_empty() {
        out.push('\n');
        for (i, text) in footnotes.seen.iter().enumerate() {
            out.push_str(&format!("[{}] {}\n", i + 1, text));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Metric;
    use pretty_assertions::assert_eq;

    fn sample_report() -> Report {
        Report {
            metrics: vec![
                Metric {
                    name: "max blob size",
                    value: 50_000_000,
                    display: "47.7 MiB".into(),
                    level_of_concern: 2,
                    overflow: false,
                    footnote: Some("Large blobs can make cloning and checkout slow.".to_string()),
                    path: Some("refs/heads/main:big.bin".to_string()),
                },
                Metric {
                    name: "unique blob count",
                    value: 10,
                    display: "10".into(),
                    level_of_concern: 0,
                    overflow: false,
                    footnote: None,
                    path: None,
                },
            ],
        }
    }

    #[test]
    fn threshold_filters_out_unremarkable_metrics() {
        let out = render_table(&sample_report(), 1);
        assert!(out.contains("max blob size"));
        assert!(!out.contains("unique blob count"));
    }

    #[test]
    fn footnote_is_printed_once_and_referenced_by_marker() {
        let out = render_table(&sample_report(), 1);
        assert!(out.contains("[1]"));
        assert_eq!(out.matches("Large blobs can make cloning").count(), 1);
    }

    #[test]
    fn zero_threshold_keeps_every_metric() {
        let out = render_table(&sample_report(), 0);
        assert!(out.contains("unique blob count"));
    }

    #[test]
    fn nothing_surviving_emits_the_sentinel_line() {
        let report = Report { metrics: Vec::new() };
        let out = render_table(&report, 1);
        assert_eq!(out, "No problems above the current threshold were found\n");
    }

    #[test]
    fn overflowing_ratio_renders_exclamation_marks_not_stars() {
        let report = Report {
            metrics: vec![Metric {
                name: "max blob size",
                value: 1_000_000_000,
                display: "953 MiB".into(),
                level_of_concern: super::super::MAX_LEVEL_OF_CONCERN,
                overflow: true,
                footnote: None,
                path: None,
            }],
        };
        let out = render_table(&report, 1);
        assert!(out.contains(&"!".repeat(super::super::MAX_LEVEL_OF_CONCERN as usize)));
        assert!(!out.contains('*'));
    }
}
