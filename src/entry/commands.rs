use std::io::Write;

use serde::Serialize;

use crate::args::{PushArgs, SampleArgs, SampleKind, TextfileArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::export::{GatewayAuth, push_stats, read_stats, validate_stats_path, write_textfile};
use crate::http::build_client;
use crate::sampling::{generate_bboxes, generate_time_intervals};

/// Prints generated samples to stdout, one JSON value per line.
pub(super) fn print_samples(args: &SampleArgs) -> AppResult<()> {
    match &args.kind {
        SampleKind::Bbox(bbox) => {
            let boxes = generate_bboxes(args.count, &bbox.params())?;
            write_json_lines(&boxes)
        }
        SampleKind::Interval(interval) => {
            let intervals = generate_time_intervals(args.count, &interval.params())?;
            write_json_lines(&intervals)
        }
    }
}

fn write_json_lines<T: Serialize>(values: &[T]) -> AppResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for value in values {
        serde_json::to_writer(&mut out, value)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

pub(super) async fn push_stats_file(args: &PushArgs) -> AppResult<()> {
    validate_stats_path(&args.csv)?;
    let gateway = args.pushgateway.as_deref().ok_or_else(|| {
        AppError::validation(ValidationError::MissingValue {
            what: "Pushgateway URL",
            flag: "--pushgateway",
        })
    })?;
    let rows = read_stats(&args.csv)?;
    let auth = args.user.as_ref().map(|user| GatewayAuth {
        user: user.clone(),
        password: args.password.clone(),
    });
    let client = build_client(args.request_timeout)?;
    push_stats(&client, gateway, auth.as_ref(), &args.job_prefix, &rows).await?;
    Ok(())
}

pub(super) async fn write_stats_textfile(args: &TextfileArgs) -> AppResult<()> {
    validate_stats_path(&args.csv)?;
    let rows = read_stats(&args.csv)?;
    write_textfile(&args.output, &args.job_prefix, &rows).await
}
