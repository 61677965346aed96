//! Locust statistics export: stats CSV parsing, text exposition rendering,
//! Pushgateway pushes, and static metrics files.
mod exposition;
mod format;
mod push;
mod stats;
mod textfile;


pub use exposition::{MetricFamily, Sample, collect_families, job_name, render_families};
pub use push::{GatewayAuth, grouping_url, push_stats};
pub use stats::{StatsRow, read_stats, validate_stats_path};
pub use textfile::write_textfile;
