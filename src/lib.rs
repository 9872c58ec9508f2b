//! labgrade library root.
//! Exposes the store, the grading engine, the CLI parser and the
//! high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod telemetry;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::Path;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => {
            cli::commands::config::handle(&cli.command, cfg, cli.config.as_deref().map(Path::new))
        }
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Event { .. } => cli::commands::event::handle(&cli.command, cfg),
        Commands::Lab { .. } => cli::commands::lab::handle(&cli.command, cfg),
        Commands::Override { .. } => cli::commands::overrides::handle(&cli.command, cfg),
        Commands::Score { .. } => cli::commands::score::handle(&cli.command, cfg),
        Commands::Stats { .. } => cli::commands::stats::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    telemetry::init();

    let cli = Cli::parse();

    // load the config once; --db wins over the file
    let mut cfg = Config::load(cli.config.as_deref().map(Path::new))?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    // `config` must stay usable to repair a broken file
    if !matches!(cli.command, Commands::Config { .. } | Commands::Init) {
        cfg.validate()?;
    }

    dispatch(&cli, &cfg)
}
