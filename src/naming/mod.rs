//! Prometheus-style names for Locust statistic columns.
//!
//! Replacements are plain substring substitutions applied in a fixed order,
//! so a column such as `Runtime` also picks up the `_seconds` suffix.


/// Prefix for every exported Locust metric.
pub const METRIC_PREFIX: &str = "locust_";
/// Suffix marking values that arrive in milliseconds.
const SECONDS_SUFFIX: &str = "time_seconds";
const MILLIS_PER_SECOND: f64 = 1000.0;

/// Ordered replacements applied before lowercasing.
const RAW_REPLACEMENTS: [(&str, &str); 4] = [
    (" ", "_"),
    ("/s", "_per_second"),
    ("%", "_percentile"),
    (".", "_"),
];

/// Ordered replacements applied after lowercasing.
const UNIT_REPLACEMENTS: [(&str, &str); 3] = [
    ("count", "count_total"),
    ("time", "time_seconds"),
    ("size", "size_bytes"),
];

#[must_use]
pub fn normalize_metric_name(name: &str) -> String {
    let raw = RAW_REPLACEMENTS
        .iter()
        .fold(name.to_owned(), |acc, (from, to)| acc.replace(from, to));
    UNIT_REPLACEMENTS
        .iter()
        .fold(raw.to_lowercase(), |acc, (from, to)| acc.replace(from, to))
}

/// Full exported name: [`METRIC_PREFIX`] followed by the normalized column.
#[must_use]
pub fn exported_metric_name(column: &str) -> String {
    format!("{}{}", METRIC_PREFIX, normalize_metric_name(column))
}

/// Converts millisecond timings to seconds for `*time_seconds` metrics.
#[must_use]
pub fn rescale_value(name: &str, value: f64) -> f64 {
    if name.ends_with(SECONDS_SUFFIX) {
        value / MILLIS_PER_SECOND
    } else {
        value
    }
}

/// Names containing digits (percentile columns) are not exported.
#[must_use]
pub fn is_exportable(name: &str) -> bool {
    !name.chars().any(|ch| ch.is_ascii_digit())
}
