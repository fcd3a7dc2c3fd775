use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::app::App;
use crate::config::Config;
use crate::utils::task_pool::build_pool;

mod cli;
mod config;
mod download;
mod logging;
mod utils;

fn main() -> Result<ExitCode> {
    let app = App::parse();
    logging::init_logging(app.verbose);

    let config = Config::load(app.config.as_deref())?;
    let pool = build_pool(config.worker_threads).context("failed to start worker pool")?;

    pool.block_on(cli::commands::run(app.cmd, &config))
}
