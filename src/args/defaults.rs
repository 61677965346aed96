pub(crate) const DEFAULT_USER_AGENT: &str = concat!("stac-perf/", env!("CARGO_PKG_VERSION"));

/// Default config filenames checked when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["stac-perf.toml", "stac-perf.json"];

pub(crate) const DEFAULT_JOB_PREFIX: &str = "stac_query";
pub(crate) const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3";
pub(crate) const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub(crate) const DEFAULT_GIST_FILENAME: &str = "brevo-stats.csv";
pub(crate) const DEFAULT_START_DATE: &str = "2024-11-01";
