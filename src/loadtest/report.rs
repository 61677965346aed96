use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::{AppError, AppResult, ExportError};

use super::stats::{EntryStats, PERCENTILES, RunStats};

const STATS_COLUMNS: [&str; 11] = [
    "Type",
    "Name",
    "Request Count",
    "Failure Count",
    "Median Response Time",
    "Average Response Time",
    "Min Response Time",
    "Max Response Time",
    "Average Content Size",
    "Requests/s",
    "Failures/s",
];
const FAILURE_COLUMNS: [&str; 4] = ["Method", "Name", "Error", "Occurrences"];
const AGGREGATED_NAME: &str = "Aggregated";
const NOT_AVAILABLE: &str = "N/A";

/// Paths of the two report files for a CSV prefix.
#[must_use]
pub fn report_paths(prefix: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}_stats.csv", prefix)),
        PathBuf::from(format!("{}_failures.csv", prefix)),
    )
}

fn format_float(value: f64) -> String {
    format!("{:.2}", value)
}

fn stats_record(kind: &str, name: &str, stats: &EntryStats, elapsed: Duration) -> Vec<String> {
    let mut record = vec![
        kind.to_owned(),
        name.to_owned(),
        stats.num_requests.to_string(),
        stats.num_failures.to_string(),
        stats.median_response_ms().to_string(),
        format_float(stats.avg_response_ms()),
        format_float(stats.min_response_ms()),
        format_float(stats.max_response_ms()),
        format_float(stats.avg_content_length()),
        format_float(stats.requests_per_second(elapsed)),
        format_float(stats.failures_per_second(elapsed)),
    ];
    record.extend(PERCENTILES.iter().map(|(_, quantile)| {
        stats
            .percentile(*quantile)
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |value| value.to_string())
    }));
    record
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> AppError + '_ {
    move |err| {
        AppError::export(ExportError::WriteCsv {
            path: path.to_path_buf(),
            source: err,
        })
    }
}

fn finish(writer: csv::Writer<Vec<u8>>, path: &Path) -> AppResult<Vec<u8>> {
    writer.into_inner().map_err(|err| {
        AppError::export(ExportError::FlushCsv {
            path: path.to_path_buf(),
            source: err.into_error(),
        })
    })
}

/// Renders the stats table: one row per request type plus `Aggregated`.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_stats_csv(stats: &RunStats, elapsed: Duration, path: &Path) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header = STATS_COLUMNS
        .iter()
        .copied()
        .chain(PERCENTILES.iter().map(|(column, _)| *column));
    writer.write_record(header).map_err(csv_error(path))?;
    for (method, name, entry) in stats.entries() {
        writer
            .write_record(stats_record(method, name, entry, elapsed))
            .map_err(csv_error(path))?;
    }
    writer
        .write_record(stats_record("", AGGREGATED_NAME, stats.total(), elapsed))
        .map_err(csv_error(path))?;
    finish(writer, path)
}

/// Renders the failures table, one row per distinct error.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_failures_csv(stats: &RunStats, path: &Path) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(FAILURE_COLUMNS)
        .map_err(csv_error(path))?;
    for ((method, name, error), occurrences) in stats.failures() {
        writer
            .write_record([
                method.as_str(),
                name.as_str(),
                error.as_str(),
                occurrences.to_string().as_str(),
            ])
            .map_err(csv_error(path))?;
    }
    finish(writer, path)
}

async fn write_file(path: &Path, content: Vec<u8>) -> AppResult<()> {
    tokio::fs::write(path, content).await.map_err(|err| {
        AppError::export(ExportError::WriteMetrics {
            path: path.to_path_buf(),
            source: err,
        })
    })
}

/// Writes `<prefix>_stats.csv` and `<prefix>_failures.csv`.
///
/// # Errors
///
/// Returns an error if rendering or writing either file fails.
pub async fn write_reports(prefix: &str, stats: &RunStats, elapsed: Duration) -> AppResult<()> {
    let (stats_path, failures_path) = report_paths(prefix);
    write_file(&stats_path, render_stats_csv(stats, elapsed, &stats_path)?).await?;
    write_file(&failures_path, render_failures_csv(stats, &failures_path)?).await?;
    info!(
        "Wrote {} and {}",
        stats_path.display(),
        failures_path.display()
    );
    Ok(())
}

pub fn log_summary(stats: &RunStats, elapsed: Duration) {
    let total = stats.total();
    info!(
        "Run finished after {:.1}s: {} request(s), {} failure(s) ({:.2}%), {:.2} req/s",
        elapsed.as_secs_f64(),
        total.num_requests,
        total.num_failures,
        total.failure_ratio() * 100.0,
        total.requests_per_second(elapsed)
    );
    if total.num_requests > 0 {
        let percentile = |quantile: f64| total.percentile(quantile).unwrap_or_default();
        info!(
            "Response times (ms): avg {:.1}, min {:.1}, max {:.1}, p50 {}, p95 {}, p99 {}",
            total.avg_response_ms(),
            total.min_response_ms(),
            total.max_response_ms(),
            percentile(0.5),
            percentile(0.95),
            percentile(0.99)
        );
    }
    for ((method, name, error), occurrences) in stats.failures() {
        info!("{} {} failed {}x: {}", method, name, occurrences, error);
    }
}
