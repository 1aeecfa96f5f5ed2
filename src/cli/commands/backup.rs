use crate::cli::commands::ask_confirmation;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::db::store::BlobStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        let dest = expand_tilde(file);

        if dest.exists()
            && !ask_confirmation(&format!("The file '{}' already exists. Overwrite it?", dest.display()))
        {
            info("Backup cancelled by user.");
            return Ok(());
        }

        let written = BackupLogic::backup_file(Path::new(&cfg.database), &dest, *compress)?;
        success(format!("Backup created: {}", written.display()));

        let mut pool = DbPool::new(&cfg.database)?;
        pool.audit(
            "backup",
            &written.to_string_lossy(),
            if *compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );
    }

    Ok(())
}
