mod commands;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::{CliArgs, Command};
use crate::config::{apply_config, load_config};
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(&args.log_level, args.verbose, args.no_color);

    if let Some(config) = load_config(args.config.as_deref())? {
        debug!("Applying config file values");
        apply_config(&mut args, &matches, &config)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<(CliArgs, ArgMatches)> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: CliArgs) -> AppResult<()> {
    match args.command {
        Command::StacQuery(query) => crate::loadtest::run_stac_query(&query).await,
        Command::Sample(sample) => commands::print_samples(&sample),
        Command::Push(push) => commands::push_stats_file(&push).await,
        Command::Textfile(textfile) => commands::write_stats_textfile(&textfile).await,
        Command::Newsletter(newsletter) => {
            crate::newsletter::export_campaign_stats(&newsletter).await
        }
        Command::Csv2Gist(gist) => crate::gist::upload_csv(&gist).await,
    }
}
