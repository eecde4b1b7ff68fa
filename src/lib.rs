pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod enrich;
pub mod format;
pub mod io_utils;
pub mod preview;
pub mod record;
pub mod report;
pub mod summary;
pub mod table;
pub mod validate;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_analytics", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Validate(args) => validate::execute(&args),
        Commands::Summary(args) => summary::execute(&args),
        Commands::Enrich(args) => enrich::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}
