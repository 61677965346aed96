//! Randomized STAC `/search` load test with Locust-compatible reports.
mod report;
mod request;
mod runner;
mod stats;
mod user;

#[cfg(test)]
mod tests;

use crate::args::StacQueryArgs;
use crate::error::AppResult;
use crate::shutdown::{
    ShutdownSender, setup_run_timer, setup_signal_shutdown_handler, shutdown_channel,
};

pub use report::{log_summary, render_failures_csv, render_stats_csv, report_paths, write_reports};
pub use request::{
    RequestRecord, SEARCH_METHOD, SEARCH_NAME, SearchRequest, check_response, execute_search,
};
pub use runner::{LoadTestReport, build_user_context, run_load_test};
pub use stats::{EntryStats, PERCENTILES, RunStats};
pub use user::{QueryPool, UserContext, WaitRange, run_user};

/// Runs the load test for `run_time` or until interrupted, then logs a
/// summary and writes the CSV reports when a prefix is set.
///
/// # Errors
///
/// Returns an error for invalid arguments or when a report cannot be written.
/// Failed requests do not fail the run.
pub async fn run_stac_query(args: &StacQueryArgs) -> AppResult<()> {
    let ctx = build_user_context(args)?;
    let (shutdown_tx, _) = shutdown_channel();
    let timer = setup_run_timer(&shutdown_tx, args.run_time);
    let signals = setup_signal_shutdown_handler(&shutdown_tx);

    let result = run_load_test(
        ctx,
        args.users.get(),
        args.spawn_rate.get(),
        &shutdown_tx,
    )
    .await;
    stop(&shutdown_tx);
    timer.await?;
    signals.await?;

    let report = result?;
    log_summary(&report.stats, report.elapsed);
    if let Some(prefix) = args.csv_prefix.as_deref() {
        write_reports(prefix, &report.stats, report.elapsed).await?;
    }
    Ok(())
}

fn stop(shutdown_tx: &ShutdownSender) {
    drop(shutdown_tx.send(()));
}
