use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_wait_arg;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::sampling::Extent;

/// Contents of `stac-perf.toml` / `stac-perf.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub stac_query: Option<StacQueryConfig>,
    pub export: Option<ExportConfig>,
    pub newsletter: Option<NewsletterConfig>,
    pub gist: Option<GistConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StacQueryConfig {
    pub host: Option<String>,
    pub users: Option<usize>,
    pub spawn_rate: Option<u64>,
    pub run_time: Option<DurationValue>,
    pub wait_min: Option<DurationValue>,
    pub wait_max: Option<DurationValue>,
    pub limit_range: Option<String>,
    pub samples: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub csv: Option<String>,
    pub extent: Option<Extent>,
    pub bbox_width: Option<f64>,
    pub bbox_height: Option<f64>,
    pub start_date: Option<String>,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    pub pushgateway: Option<String>,
    pub user: Option<String>,
    pub job_prefix: Option<String>,
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsletterConfig {
    pub api_url: Option<String>,
    pub limit: Option<u32>,
    pub include_html: Option<bool>,
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GistConfig {
    pub filename: Option<String>,
    pub api_url: Option<String>,
    pub timeout: Option<DurationValue>,
}

/// Duration given either as plain seconds or with a `ms/s/m/h` suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> AppResult<Duration> {
        let duration = self.to_wait_duration(field)?;
        if duration.as_millis() == 0 {
            return Err(AppError::config(ConfigError::InvalidDuration {
                field,
                source: ValidationError::DurationZero,
            }));
        }
        Ok(duration)
    }

    /// Same as [`Self::to_duration`] but accepts zero.
    pub(crate) fn to_wait_duration(&self, field: &'static str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_wait_arg(text).map_err(|err| match err {
                AppError::Validation(source) => {
                    AppError::config(ConfigError::InvalidDuration { field, source })
                }
                other => other,
            }),
        }
    }
}
