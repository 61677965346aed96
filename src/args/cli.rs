use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};

use crate::sampling::{BboxParams, Extent, IntervalParams};

use super::defaults::{
    DEFAULT_BREVO_API_URL, DEFAULT_GIST_FILENAME, DEFAULT_GITHUB_API_URL, DEFAULT_JOB_PREFIX,
    DEFAULT_START_DATE,
};
use super::parsers::{
    parse_bool_env, parse_date_arg, parse_duration_arg, parse_extent, parse_http_url,
    parse_positive_u64, parse_positive_usize, parse_wait_arg,
};
use super::types::{LimitRange, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Performance-testing toolkit for STAC APIs - randomized search load tests, Locust stats export to Prometheus, and campaign statistics helpers."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML/JSON). Defaults to ./stac-perf.toml or ./stac-perf.json if present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by STAC_PERF_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log level used when STAC_PERF_LOG/RUST_LOG are unset (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", global = true)]
    pub log_level: String,

    /// Disable colored log output
    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        global = true,
        default_value_t = false,
        value_parser = parse_bool_env,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load test a STAC API /search endpoint with random bbox/datetime queries
    #[command(name = "stac-query")]
    StacQuery(StacQueryArgs),
    /// Print randomly generated query parameters as JSON lines
    Sample(SampleArgs),
    /// Push a locust _stats.csv file to a Prometheus Pushgateway
    Push(PushArgs),
    /// Write a locust _stats.csv file as a static Prometheus metrics file
    Textfile(TextfileArgs),
    /// Aggregate email campaign statistics from brevo.com into a CSV file
    Newsletter(NewsletterArgs),
    /// Upload a CSV file into a GitHub gist
    #[command(name = "csv2gist")]
    Csv2Gist(GistArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BboxArgs {
    /// Extent that generated boxes must fit into: min_lon,min_lat,max_lon,max_lat
    #[arg(
        long,
        default_value_t = Extent::EUROPE,
        value_parser = parse_extent,
        allow_hyphen_values = true
    )]
    pub extent: Extent,

    /// Box width in degrees of longitude
    #[arg(long = "bbox-width", default_value_t = 1.0)]
    pub bbox_width: f64,

    /// Box height in degrees of latitude
    #[arg(long = "bbox-height", default_value_t = 1.0)]
    pub bbox_height: f64,
}

impl BboxArgs {
    #[must_use]
    pub const fn params(&self) -> BboxParams {
        BboxParams {
            extent: self.extent,
            width: self.bbox_width,
            height: self.bbox_height,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct IntervalArgs {
    /// Base date of the one-year window (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(
        long = "start-date",
        default_value = DEFAULT_START_DATE,
        value_parser = parse_date_arg
    )]
    pub start_date: NaiveDateTime,

    /// Minimum interval length in days
    #[arg(long = "min-duration", default_value_t = 5)]
    pub min_duration: u32,

    /// Maximum interval length in days
    #[arg(long = "max-duration", default_value_t = 31)]
    pub max_duration: u32,
}

impl IntervalArgs {
    #[must_use]
    pub const fn params(&self) -> IntervalParams {
        IntervalParams {
            start_date: self.start_date,
            min_duration_days: self.min_duration,
            max_duration_days: self.max_duration,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct StacQueryArgs {
    /// Base URL of the STAC API (requests go to <host>/search)
    #[arg(long, value_parser = parse_http_url)]
    pub host: Option<String>,

    /// Number of simulated users
    #[arg(long, short = 'u', default_value = "10", value_parser = parse_positive_usize)]
    pub users: PositiveUsize,

    /// Users started per second
    #[arg(long = "spawn-rate", short = 'r', default_value = "1", value_parser = parse_positive_u64)]
    pub spawn_rate: PositiveU64,

    /// Run time of the test (supports ms/s/m/h)
    #[arg(long = "run-time", short = 't', default_value = "60s", value_parser = parse_duration_arg)]
    pub run_time: Duration,

    /// Minimum wait between two requests of a user (supports ms/s/m/h, 0 allowed)
    #[arg(long = "wait-min", default_value = "1s", value_parser = parse_wait_arg)]
    pub wait_min: Duration,

    /// Maximum wait between two requests of a user (supports ms/s/m/h, 0 allowed)
    #[arg(long = "wait-max", default_value = "3s", value_parser = parse_wait_arg)]
    pub wait_max: Duration,

    /// Range of the random `limit` search parameter (min-max)
    #[arg(long = "limit-range", default_value = "10-500")]
    pub limit_range: LimitRange,

    /// Number of boxes and intervals each user pre-generates
    #[arg(long = "samples", default_value_t = 10)]
    pub samples: usize,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Write <PREFIX>_stats.csv and <PREFIX>_failures.csv after the run
    #[arg(long = "csv")]
    pub csv_prefix: Option<String>,

    #[command(flatten)]
    pub bbox: BboxArgs,

    #[command(flatten)]
    pub interval: IntervalArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(subcommand)]
    pub kind: SampleKind,

    /// Number of samples to print
    #[arg(long, short = 'n', global = true, default_value_t = 10)]
    pub count: usize,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SampleKind {
    /// Random bounding boxes
    Bbox(BboxArgs),
    /// Random ISO-8601 time intervals
    Interval(IntervalArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PushArgs {
    /// Path to a locust _stats.csv file
    pub csv: PathBuf,

    /// URL of the Pushgateway
    #[arg(long, value_parser = parse_http_url)]
    pub pushgateway: Option<String>,

    /// Basic auth username for the Pushgateway
    #[arg(long, env = "PUSHGATEWAY_USER")]
    pub user: Option<String>,

    /// Basic auth password for the Pushgateway
    #[arg(long, env = "PUSHGATEWAY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Prefix of the pushed job names (<prefix>_<endpoint>)
    #[arg(long = "job-prefix", default_value = DEFAULT_JOB_PREFIX)]
    pub job_prefix: String,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,
}

#[derive(Debug, Args, Clone)]
pub struct TextfileArgs {
    /// Path to a locust _stats.csv file
    pub csv: PathBuf,

    /// Output metrics file (e.g. a node-exporter textfile collector .prom file)
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Prefix of the job label values (<prefix>_<endpoint>)
    #[arg(long = "job-prefix", default_value = DEFAULT_JOB_PREFIX)]
    pub job_prefix: String,
}

#[derive(Debug, Args, Clone)]
pub struct NewsletterArgs {
    /// Output CSV file
    pub csv: PathBuf,

    /// Brevo API key
    #[arg(long = "api-key", env = "BREVO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Brevo API base URL
    #[arg(long = "api-url", default_value = DEFAULT_BREVO_API_URL, value_parser = parse_http_url)]
    pub api_url: String,

    /// Maximum number of campaigns to fetch
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Include the campaign HTML content in the API response
    #[arg(long = "include-html")]
    pub include_html: bool,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,
}

#[derive(Debug, Args, Clone)]
pub struct GistArgs {
    /// CSV file to upload
    pub csv: PathBuf,

    /// Target gist id
    pub gist_id: String,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File name inside the gist
    #[arg(long, default_value = DEFAULT_GIST_FILENAME)]
    pub filename: String,

    /// GitHub API base URL
    #[arg(long = "api-url", default_value = DEFAULT_GITHUB_API_URL, value_parser = parse_http_url)]
    pub api_url: String,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,
}
