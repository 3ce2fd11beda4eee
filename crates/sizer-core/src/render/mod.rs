//! Turning a finished walk's [`crate::graph::HistorySnapshot`] into a report a human
//! can read: a level-of-concern rating per metric, and two renderings of that rating —
//! an ASCII table ([`table`]) and a structured form suitable for machine consumption
//! ([`structured`]).

pub mod structured;
pub mod table;

use crate::counter::{humanize, PrefixStyle};
use crate::graph::HistorySnapshot;

pub use structured::StructuredReport;
pub use table::render_table;

/// A metric definition: its human name, the counter-style unit it's measured in, and
/// its reference threshold — the "interesting" value against which the level of
/// concern is computed as `value / reference_threshold`.
struct MetricDef {
    name: &'static str,
    unit: &'static str,
    threshold: f64,
    /// Static cautionary text, independent of which object triggered the metric.
    /// Combined with the object's own resolved path (if any) at report-build time.
    note: Option<&'static str>,
}

/// Level of concern is clamped to this many stars; a metric whose raw, unclamped
/// ratio exceeds the cap renders as an overflow marker instead of a star count.
pub const MAX_LEVEL_OF_CONCERN: u8 = 30;

/// One row of the rendered report: a metric's name, its humanized value, its
/// computed level of concern (0 = unremarkable, clamped to [`MAX_LEVEL_OF_CONCERN`]),
/// whether the raw ratio overflowed that cap, an optional static cautionary note, and
/// the path (or OID-hex fallback) of the object that actually holds the record, for
/// metrics backed by a single object rather than an aggregate total.
pub struct Metric {
    pub name: &'static str,
    pub value: u64,
    pub display: String,
    pub level_of_concern: u8,
    pub overflow: bool,
    pub footnote: Option<String>,
    pub path: Option<String>,
}

/// A complete, ready-to-render report.
pub struct Report {
    pub metrics: Vec<Metric>,
}

/// `value / reference_threshold`, clamped to `[0, MAX_LEVEL_OF_CONCERN]`. Returns the
/// clamped star count and whether the unclamped ratio exceeded the cap.
fn level_of_concern(value: u64, threshold: f64) -> (u8, bool) {
    if threshold <= 0.0 {
        return (0, false);
    }
    let ratio = value as f64 / threshold;
    if ratio > MAX_LEVEL_OF_CONCERN as f64 {
        (MAX_LEVEL_OF_CONCERN, true)
    } else {
        (ratio.round() as u8, false)
    }
}

fn metric_defs() -> Vec<MetricDef> {
    vec![
        MetricDef { name: "unique blob count", unit: "", threshold: 500_000.0, note: None },
        MetricDef {
            name: "unique blob size",
            unit: "B",
            threshold: 10.0 * 1024.0 * 1024.0 * 1024.0,
            note: Some("Total size of unique blob contents may slow down fresh clones."),
        },
        MetricDef { name: "unique tree count", unit: "", threshold: 1_000_000.0, note: None },
        MetricDef { name: "unique commit count", unit: "", threshold: 1_000_000.0, note: None },
        MetricDef { name: "unique tag count", unit: "", threshold: 100_000.0, note: None },
        MetricDef {
            name: "max blob size",
            unit: "B",
            threshold: 10.0 * 1024.0 * 1024.0,
            note: Some("Large blobs can make cloning and checkout slow."),
        },
        MetricDef {
            name: "max checkout path depth",
            unit: "",
            threshold: 10.0,
            note: Some("Deeply nested paths can exceed filesystem limits on some platforms."),
        },
        MetricDef {
            name: "max checkout path length",
            unit: "B",
            threshold: 100.0,
            note: Some("Long paths can exceed filesystem limits on some platforms."),
        },
        MetricDef { name: "max tree entries", unit: "", threshold: 2_500.0, note: None },
        MetricDef {
            name: "max expanded blob size",
            unit: "B",
            threshold: 1024.0 * 1024.0 * 1024.0,
            note: Some("Total size of unique blob contents may slow down fresh clones."),
        },
        MetricDef {
            name: "max commit ancestor depth",
            unit: "",
            threshold: 100_000.0,
            note: Some("Deep history can make some operations, like blame, slow."),
        },
        MetricDef {
            name: "max parent count",
            unit: "",
            threshold: 8.0,
            note: Some("Commits with many parents are unusual outside of merge-heavy workflows."),
        },
        MetricDef {
            name: "max tag depth",
            unit: "",
            threshold: 1.0,
            note: Some("Chains of tags pointing to tags can confuse some tools."),
        },
        MetricDef { name: "reference count", unit: "", threshold: 50_000.0, note: None },
    ]
}

/// Build a [`Report`] from a finished walk's history snapshot.
pub fn build_report(snapshot: &HistorySnapshot) -> Report {
    let values: Vec<u64> = vec![
        snapshot.unique_blob_count,
        snapshot.unique_blob_size,
        snapshot.unique_tree_count,
        snapshot.unique_commit_count,
        snapshot.unique_tag_count,
        snapshot.max_blob_size as u64,
        snapshot.max_checkout_path_depth as u64,
        snapshot.max_checkout_path_length as u64,
        snapshot.max_tree_entries as u64,
        snapshot.max_expanded_blob_size,
        snapshot.max_commit_ancestor_depth as u64,
        snapshot.max_parent_count as u64,
        snapshot.max_tag_depth as u64,
        snapshot.reference_count,
    ];

    // Parallel to `values`: the path of the object that actually holds each metric's
    // record, where the metric names one (the `unique_*`/`reference_count` metrics are
    // aggregate totals with no single object behind them).
    let paths: Vec<Option<&String>> = vec![
        None,
        None,
        None,
        None,
        None,
        snapshot.max_blob_size_path.as_ref(),
        snapshot.max_checkout_path_depth_path.as_ref(),
        snapshot.max_checkout_path_length_path.as_ref(),
        snapshot.max_tree_entries_path.as_ref(),
        snapshot.max_expanded_blob_size_path.as_ref(),
        snapshot.max_commit_ancestor_depth_path.as_ref(),
        snapshot.max_parent_count_path.as_ref(),
        snapshot.max_tag_depth_path.as_ref(),
        None,
    ];

    let metrics = metric_defs()
        .into_iter()
        .zip(values)
        .zip(paths)
        .map(|((def, value), path)| {
            let display = if def.unit.is_empty() {
                value.to_string()
            } else {
                humanize(value, PrefixStyle::Binary, def.unit)
            };
            let (level_of_concern, overflow) = level_of_concern(value, def.threshold);
            Metric {
                name: def.name,
                value,
                display,
                level_of_concern,
                overflow,
                footnote: def.note.map(str::to_string),
                path: path.cloned(),
            }
        })
        .collect();

    Report { metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn below_threshold_is_unremarkable() {
        assert_eq!(level_of_concern(5, 100.0), (0, false));
    }

    #[test]
    fn at_threshold_is_one_star() {
        assert_eq!(level_of_concern(100, 100.0), (1, false));
    }

    #[test]
    fn ratio_rounds_to_the_nearest_star() {
        assert_eq!(level_of_concern(150, 100.0), (2, false));
        assert_eq!(level_of_concern(249, 100.0), (2, false));
    }

    #[test]
    fn ratio_above_the_cap_overflows_instead_of_clamping_silently() {
        let (stars, overflow) = level_of_concern(100_000, 100.0);
        assert_eq!(stars, MAX_LEVEL_OF_CONCERN);
        assert!(overflow);
    }

    #[test]
    fn zero_threshold_is_never_a_concern() {
        assert_eq!(level_of_concern(1_000_000, 0.0), (0, false));
    }
}
