use std::time::Duration;

use crate::args::{LimitRange, parse_duration_arg};
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult};
use crate::naming::{exported_metric_name, is_exportable, normalize_metric_name, rescale_value};
use crate::sampling::{Extent, parse_start_date};

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses an extent in `min_lon,min_lat,max_lon,max_lat` form.
///
/// # Errors
///
/// Returns an error when the extent is malformed.
pub fn parse_extent_input(input: &str) -> AppResult<Extent> {
    input.parse::<Extent>().map_err(AppError::from)
}

/// Parses a search limit range in `min-max` form.
///
/// # Errors
///
/// Returns an error when the range is malformed.
pub fn parse_limit_range_input(input: &str) -> AppResult<LimitRange> {
    input.parse::<LimitRange>().map_err(AppError::from)
}

/// Parses a base date for interval sampling.
///
/// # Errors
///
/// Returns an error when the date is invalid.
pub fn parse_start_date_input(input: &str) -> AppResult<()> {
    parse_start_date(input).map(drop).map_err(AppError::from)
}

/// Normalizes a column name and rescales a value for it.
#[must_use]
pub fn normalize_metric_input(input: &str, value: f64) -> (String, bool, f64) {
    let normalized = normalize_metric_name(input);
    let exportable = is_exportable(&exported_metric_name(input));
    let rescaled = rescale_value(&normalized, value);
    (normalized, exportable, rescaled)
}

/// Parses a TOML config file body.
///
/// # Errors
///
/// Returns an error when the TOML is invalid.
pub fn parse_config_toml(input: &str) -> AppResult<ConfigFile> {
    toml::from_str(input).map_err(AppError::from)
}

/// Parses a JSON config file body.
///
/// # Errors
///
/// Returns an error when the JSON is invalid.
pub fn parse_config_json(input: &str) -> AppResult<ConfigFile> {
    serde_json::from_str(input).map_err(AppError::from)
}
