use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::store::BlobStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the SQLite database with its `kv` and `log` tables
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    info("Initializing rTimeLedger…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let mut pool = DbPool::new(&cfg.database)?;
    pool.audit(
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    );

    success(format!("Database initialized at {}", &cfg.database));
    Ok(())
}
