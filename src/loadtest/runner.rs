use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::args::StacQueryArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{build_client, join_url};
use crate::shutdown::ShutdownSender;

use super::request::RequestRecord;
use super::stats::RunStats;
use super::user::{UserContext, WaitRange, run_user};

/// Capacity of the channel from users to the statistics collector.
const RESULT_CHANNEL_CAPACITY: usize = 1024;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Collected statistics and the wall-clock duration of a run.
#[derive(Debug)]
pub struct LoadTestReport {
    pub stats: RunStats,
    pub elapsed: Duration,
}

/// Checks the arguments and builds the state shared by all users.
///
/// # Errors
///
/// Returns an error for a missing host, invalid sampling parameters, an
/// inverted wait range, or when the HTTP client cannot be built.
pub fn build_user_context(args: &StacQueryArgs) -> AppResult<UserContext> {
    let host = args.host.as_deref().ok_or_else(|| {
        AppError::validation(ValidationError::MissingValue {
            what: "STAC API host",
            flag: "--host",
        })
    })?;
    let bbox = args.bbox.params();
    bbox.validate()?;
    let interval = args.interval.params();
    interval.validate()?;
    if args.samples == 0 {
        return Err(AppError::validation(ValidationError::EmptySamplePool));
    }
    let wait = WaitRange::new(args.wait_min, args.wait_max)?;

    Ok(UserContext {
        client: build_client(args.request_timeout)?,
        search_url: join_url(host, "search")?,
        bbox,
        interval,
        samples: args.samples,
        limits: args.limit_range,
        wait,
    })
}

fn spawn_interval(spawn_rate: u64) -> Duration {
    NANOS_PER_SECOND
        .checked_div(spawn_rate)
        .map(Duration::from_nanos)
        .unwrap_or_default()
}

fn spawn_collector(
    mut results_rx: mpsc::Receiver<RequestRecord>,
) -> AppResult<JoinHandle<RunStats>> {
    let mut stats = RunStats::new().map_err(AppError::export)?;
    Ok(tokio::spawn(async move {
        while let Some(record) = results_rx.recv().await {
            if let Err(err) = stats.record(&record) {
                warn!("Failed to record request: {}", err);
            }
        }
        stats
    }))
}

/// Spawns `user_count` users, `spawn_rate` per second, and collects their
/// results until shutdown is broadcast.
///
/// # Errors
///
/// Returns an error when the collector cannot be created or a task panics.
pub async fn run_load_test(
    ctx: UserContext,
    user_count: usize,
    spawn_rate: u64,
    shutdown_tx: &ShutdownSender,
) -> AppResult<LoadTestReport> {
    let ctx = Arc::new(ctx);
    let (results_tx, results_rx) = mpsc::channel::<RequestRecord>(RESULT_CHANNEL_CAPACITY);
    let collector = spawn_collector(results_rx)?;

    let interval = spawn_interval(spawn_rate);
    info!(
        "Starting {} user(s) at {}/s against {}",
        user_count, spawn_rate, ctx.search_url
    );

    let started = Instant::now();
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut users = Vec::new();
    for user_id in 0..user_count {
        users.push(tokio::spawn(run_user(
            Arc::clone(&ctx),
            user_id,
            shutdown_tx.subscribe(),
            results_tx.clone(),
        )));
        if user_id.saturating_add(1) == user_count {
            info!("All {} user(s) spawned", user_count);
            break;
        }
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
    drop(results_tx);

    for user in users {
        user.await?;
    }
    let elapsed = started.elapsed();
    let stats = collector.await?;
    Ok(LoadTestReport { stats, elapsed })
}
