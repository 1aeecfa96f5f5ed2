//! rTimeLedger library root.
//! Exposes the CLI parser, the high-level run() function and the ledger
//! modules (models, validation, storage, migration, statistics).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::bootstrap::bootstrap;
use crate::core::migrate::MigrationOutcome;
use crate::db::pool::DbPool;
use crate::db::repository::Repository;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use clap::Parser;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Clock { .. } | Commands::Close { .. } => {
            cli::commands::clock::handle(&cli.command, cfg)
        }
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, cfg),
        Commands::Save { .. } => cli::commands::save::handle(&cli.command, cfg),
        Commands::Del { .. } => cli::commands::del::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Stats { .. } => cli::commands::stats::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Import { .. } => cli::commands::import::handle(&cli.command, cfg),
        Commands::Migrate => cli::commands::migrate::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
    }
}

/// Commands that work on the ledger get the startup sequence first.
fn needs_bootstrap(cmd: &Commands) -> bool {
    !matches!(
        cmd,
        Commands::Init | Commands::Config { .. } | Commands::Log { .. } | Commands::Migrate
    )
}

fn startup(cfg: &Config) -> AppResult<()> {
    let mut repo = Repository::new(DbPool::new(&cfg.database)?);
    let report = bootstrap(&mut repo);

    if let Some(MigrationOutcome::Migrated(r)) = &report.migration {
        info(format!(
            "Legacy records migrated: {} day(s), {} entry(ies) kept aside.",
            r.days_created,
            r.defects.len()
        ));
    }
    for e in &report.errors {
        warning(format!("Startup check skipped: {e}"));
    }
    Ok(())
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    utils::logging::init_tracing(&cfg.log_level);

    if needs_bootstrap(&cli.command) {
        startup(&cfg)?;
    }

    dispatch(&cli, &cfg)
}
