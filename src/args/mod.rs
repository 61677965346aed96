//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::{
    BboxArgs, CliArgs, Command, GistArgs, IntervalArgs, NewsletterArgs, PushArgs, SampleArgs,
    SampleKind, StacQueryArgs, TextfileArgs,
};
pub use types::{LimitRange, PositiveU64, PositiveUsize};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT};
pub(crate) use parsers::{parse_duration_arg, parse_http_url, parse_wait_arg};
