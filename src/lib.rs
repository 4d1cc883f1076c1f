pub mod cli;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod expiry;
pub mod io_utils;
pub mod lookup;
pub mod search;
pub mod shell;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands},
    config::LookupConfig,
};

pub use crate::{
    dataset::{Dataset, LoadOptions, Record, load_dataset},
    engine::{LookupEngine, Snapshot},
    error::LookupError,
    expiry::is_expired,
    search::{MatchResult, SearchOutcome, search},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("plate_lookup", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = LookupConfig::load_or_default(cli.config.as_deref())
        .context("Loading lookup configuration")?;
    debug!("Effective configuration: {config:?}");
    match cli.command {
        Commands::Search(args) => lookup::execute_search(&args, &config),
        Commands::Columns(args) => lookup::execute_columns(&args, &config),
        Commands::Shell(args) => shell::execute(&args, &config),
    }
}
