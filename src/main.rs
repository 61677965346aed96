mod args;
mod config;
mod entry;
mod error;
mod export;
mod gist;
mod http;
mod loadtest;
mod logger;
mod naming;
mod newsletter;
mod sampling;
mod shutdown;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
