use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{
    CliArgs, Command, GistArgs, LimitRange, NewsletterArgs, PositiveU64, PositiveUsize, PushArgs,
    StacQueryArgs, TextfileArgs, parse_http_url,
};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::sampling::parse_start_date;

use super::types::{ConfigFile, ExportConfig, GistConfig, NewsletterConfig, StacQueryConfig};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line (or through their environment variable)
/// take precedence over the config file.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut CliArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    let Some((_, sub_matches)) = matches.subcommand() else {
        return Ok(());
    };
    match &mut args.command {
        Command::StacQuery(query) => {
            if let Some(section) = config.stac_query.as_ref() {
                apply_stac_query(query, sub_matches, section)?;
            }
        }
        Command::Push(push) => {
            if let Some(section) = config.export.as_ref() {
                apply_push(push, sub_matches, section)?;
            }
        }
        Command::Textfile(textfile) => {
            if let Some(section) = config.export.as_ref() {
                apply_textfile(textfile, sub_matches, section);
            }
        }
        Command::Newsletter(newsletter) => {
            if let Some(section) = config.newsletter.as_ref() {
                apply_newsletter(newsletter, sub_matches, section)?;
            }
        }
        Command::Csv2Gist(gist) => {
            if let Some(section) = config.gist.as_ref() {
                apply_gist(gist, sub_matches, section)?;
            }
        }
        Command::Sample(_) => {}
    }
    Ok(())
}

fn apply_stac_query(
    args: &mut StacQueryArgs,
    matches: &ArgMatches,
    config: &StacQueryConfig,
) -> AppResult<()> {
    if !is_explicit(matches, "host")
        && let Some(host) = config.host.as_deref()
    {
        args.host = Some(field("host", parse_http_url(host))?);
    }

    if !is_explicit(matches, "users")
        && let Some(users) = config.users
    {
        args.users = PositiveUsize::try_from(users)
            .map_err(|_err| AppError::config(ConfigError::FieldMustBePositive { field: "users" }))?;
    }

    if !is_explicit(matches, "spawn_rate")
        && let Some(rate) = config.spawn_rate
    {
        args.spawn_rate = PositiveU64::try_from(rate).map_err(|_err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: "spawn_rate",
            })
        })?;
    }

    if !is_explicit(matches, "run_time")
        && let Some(value) = config.run_time.as_ref()
    {
        args.run_time = value.to_duration("run_time")?;
    }

    if !is_explicit(matches, "wait_min")
        && let Some(value) = config.wait_min.as_ref()
    {
        args.wait_min = value.to_wait_duration("wait_min")?;
    }

    if !is_explicit(matches, "wait_max")
        && let Some(value) = config.wait_max.as_ref()
    {
        args.wait_max = value.to_wait_duration("wait_max")?;
    }

    if !is_explicit(matches, "limit_range")
        && let Some(value) = config.limit_range.as_deref()
    {
        args.limit_range = value.parse::<LimitRange>().map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "limit_range",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "samples")
        && let Some(samples) = config.samples
    {
        args.samples = samples;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = value.to_duration("timeout")?;
    }

    if !is_explicit(matches, "csv_prefix")
        && let Some(prefix) = config.csv.clone()
    {
        args.csv_prefix = Some(prefix);
    }

    if !is_explicit(matches, "extent")
        && let Some(extent) = config.extent
    {
        args.bbox.extent = extent;
    }

    if !is_explicit(matches, "bbox_width")
        && let Some(width) = config.bbox_width
    {
        args.bbox.bbox_width = width;
    }

    if !is_explicit(matches, "bbox_height")
        && let Some(height) = config.bbox_height
    {
        args.bbox.bbox_height = height;
    }

    if !is_explicit(matches, "start_date")
        && let Some(value) = config.start_date.as_deref()
    {
        args.interval.start_date = parse_start_date(value).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "start_date",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "min_duration")
        && let Some(days) = config.min_duration
    {
        args.interval.min_duration = days;
    }

    if !is_explicit(matches, "max_duration")
        && let Some(days) = config.max_duration
    {
        args.interval.max_duration = days;
    }

    Ok(())
}

fn apply_push(args: &mut PushArgs, matches: &ArgMatches, config: &ExportConfig) -> AppResult<()> {
    if !is_explicit(matches, "pushgateway")
        && let Some(url) = config.pushgateway.as_deref()
    {
        args.pushgateway = Some(field("pushgateway", parse_http_url(url))?);
    }

    if !is_explicit(matches, "user")
        && let Some(user) = config.user.clone()
    {
        args.user = Some(user);
    }

    if !is_explicit(matches, "job_prefix")
        && let Some(prefix) = config.job_prefix.clone()
    {
        args.job_prefix = prefix;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = value.to_duration("timeout")?;
    }

    Ok(())
}

fn apply_textfile(args: &mut TextfileArgs, matches: &ArgMatches, config: &ExportConfig) {
    if !is_explicit(matches, "job_prefix")
        && let Some(prefix) = config.job_prefix.clone()
    {
        args.job_prefix = prefix;
    }
}

fn apply_newsletter(
    args: &mut NewsletterArgs,
    matches: &ArgMatches,
    config: &NewsletterConfig,
) -> AppResult<()> {
    if !is_explicit(matches, "api_url")
        && let Some(url) = config.api_url.as_deref()
    {
        args.api_url = field("api_url", parse_http_url(url))?;
    }

    if !is_explicit(matches, "limit")
        && let Some(limit) = config.limit
    {
        args.limit = limit;
    }

    if !is_explicit(matches, "include_html")
        && let Some(include) = config.include_html
    {
        args.include_html = include;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = value.to_duration("timeout")?;
    }

    Ok(())
}

fn apply_gist(args: &mut GistArgs, matches: &ArgMatches, config: &GistConfig) -> AppResult<()> {
    if !is_explicit(matches, "filename")
        && let Some(filename) = config.filename.clone()
    {
        args.filename = filename;
    }

    if !is_explicit(matches, "api_url")
        && let Some(url) = config.api_url.as_deref()
    {
        args.api_url = field("api_url", parse_http_url(url))?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = value.to_duration("timeout")?;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn field<T>(name: &'static str, result: AppResult<T>) -> AppResult<T> {
    result.map_err(|err| match err {
        AppError::Validation(source) => invalid_field(name, source),
        other => other,
    })
}

fn invalid_field(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}
