use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::error::AppResult;
use crate::naming::{exported_metric_name, is_exportable, rescale_value};

use super::format::{escape_help, escape_label_value, format_value, write_line};
use super::stats::StatsRow;

/// Label carrying the `Type` column.
const METHOD_LABEL: &str = "method";
/// Label carrying the `Name` column.
const ENDPOINT_LABEL: &str = "endpoint";
const JOB_LABEL: &str = "job";

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// Gauge family rendered with one `# HELP`/`# TYPE` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub samples: Vec<Sample>,
}

/// Groups the exportable columns of `rows` into gauge families.
///
/// Aggregated rows are skipped, names containing digits are skipped, and
/// millisecond timings are converted to seconds. With `job_prefix` set each
/// sample also carries a `job="<prefix>_<row name>"` label.
#[must_use]
pub fn collect_families(rows: &[StatsRow], job_prefix: Option<&str>) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows.iter().filter(|row| !row.is_aggregated()) {
        let mut labels = Vec::with_capacity(3);
        if let Some(prefix) = job_prefix {
            labels.push((JOB_LABEL, job_name(prefix, row)));
        }
        labels.push((METHOD_LABEL, row.kind.clone()));
        labels.push((ENDPOINT_LABEL, row.name.clone()));

        let mut seen = BTreeSet::new();
        for (column, value) in &row.values {
            let name = exported_metric_name(column);
            if !is_exportable(&name) {
                continue;
            }
            if !seen.insert(name.clone()) {
                warn!(
                    "Column '{}' of row '{}' maps to duplicate metric '{}'; skipping",
                    column, row.name, name
                );
                continue;
            }
            let sample = Sample {
                labels: labels.clone(),
                value: rescale_value(&name, *value),
            };
            if let Some(family) = index.get(&name).and_then(|idx| families.get_mut(*idx)) {
                family.samples.push(sample);
            } else {
                index.insert(name.clone(), families.len());
                families.push(MetricFamily {
                    help: format!("Locust statistic '{}'.", column),
                    name,
                    samples: vec![sample],
                });
            }
        }
    }
    families
}

/// Job name of a row: `<prefix>_<Name without leading slashes>`.
#[must_use]
pub fn job_name(prefix: &str, row: &StatsRow) -> String {
    format!("{}_{}", prefix, row.row_name())
}

/// Renders families in the Prometheus text exposition format.
///
/// # Errors
///
/// Returns an error if writing to the output buffer fails.
pub fn render_families(families: &[MetricFamily]) -> AppResult<String> {
    let mut output = String::new();
    for family in families {
        write_line(
            &mut output,
            &format!("# HELP {} {}", family.name, escape_help(&family.help)),
        )?;
        write_line(&mut output, &format!("# TYPE {} gauge", family.name))?;
        for sample in &family.samples {
            let labels = sample
                .labels
                .iter()
                .map(|(key, value)| format!("{}=\"{}\"", key, escape_label_value(value)))
                .collect::<Vec<_>>()
                .join(",");
            write_line(
                &mut output,
                &format!("{}{{{}}} {}", family.name, labels, format_value(sample.value)),
            )?;
        }
    }
    Ok(output)
}
