use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult, ExportError, ValidationError};

/// Suffix locust uses for the request statistics file.
const STATS_SUFFIX: &str = "_stats.csv";
const TYPE_COLUMN: &str = "Type";
const NAME_COLUMN: &str = "Name";
/// Row name of the locust totals row.
pub(crate) const AGGREGATED_ROW: &str = "Aggregated";

/// One request group of a locust stats file.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    /// `Type` column, usually the HTTP method.
    pub kind: String,
    /// `Name` column as written by locust (e.g. `/search`).
    pub name: String,
    /// Remaining columns in file order. Cells that are not numbers are dropped.
    pub values: Vec<(String, f64)>,
}

impl StatsRow {
    /// Name with leading slashes removed, used for job names.
    #[must_use]
    pub fn row_name(&self) -> &str {
        self.name.trim_start_matches('/')
    }

    #[must_use]
    pub fn is_aggregated(&self) -> bool {
        self.row_name() == AGGREGATED_ROW
    }
}

/// Accepts only existing files named `*_stats.csv`.
///
/// # Errors
///
/// Returns an error when the path is not a locust stats file.
pub fn validate_stats_path(path: &Path) -> AppResult<()> {
    let named_like_stats = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(STATS_SUFFIX));
    if !path.is_file() || !named_like_stats {
        return Err(AppError::validation(
            ValidationError::UnsupportedStatsFile {
                path: path.display().to_string(),
            },
        ));
    }
    Ok(())
}

/// Reads every row of a locust stats file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not valid CSV, or lacks
/// the `Type`/`Name` columns.
pub fn read_stats(path: &Path) -> AppResult<Vec<StatsRow>> {
    let read_error = |err: csv::Error| {
        AppError::export(ExportError::ReadStats {
            path: path.to_path_buf(),
            source: err,
        })
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(read_error)?;
    let headers = reader.headers().map_err(read_error)?.clone();
    let type_idx = column_index(&headers, TYPE_COLUMN, path)?;
    let name_idx = column_index(&headers, NAME_COLUMN, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        let mut values = Vec::with_capacity(headers.len().saturating_sub(2));
        for (idx, (column, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if idx == type_idx || idx == name_idx {
                continue;
            }
            match parse_cell(cell) {
                Some(value) => values.push((column.to_owned(), value)),
                None => debug!("Skipping non-numeric value '{}' of column '{}'", cell, column),
            }
        }
        rows.push(StatsRow {
            kind: record.get(type_idx).unwrap_or_default().to_owned(),
            name: record.get(name_idx).unwrap_or_default().to_owned(),
            values,
        });
    }
    Ok(rows)
}

fn column_index(
    headers: &csv::StringRecord,
    column: &'static str,
    path: &Path,
) -> AppResult<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| {
            AppError::export(ExportError::MissingColumn {
                path: PathBuf::from(path),
                column,
            })
        })
}

fn parse_cell(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}
