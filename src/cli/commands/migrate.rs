use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::bootstrap::bootstrap;
use crate::core::migrate::MigrationOutcome;
use crate::db::pool::DbPool;
use crate::db::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Migrate) {
        let mut repo = Repository::new(DbPool::new(&cfg.database)?);
        let report = bootstrap(&mut repo);

        if let Some(e) = report.errors.first() {
            return Err(AppError::MigrationFailure(e.clone()));
        }

        match report.migration {
            Some(MigrationOutcome::AlreadyCompleted) => info("Migration already completed."),
            Some(MigrationOutcome::NothingToMigrate) => {
                info("No legacy records found; migration marked as completed.")
            }
            Some(MigrationOutcome::Migrated(r)) => {
                success(format!(
                    "Migrated {} legacy event(s) into {} day(s) ({} in progress).",
                    r.legacy_events, r.days_created, r.open_days
                ));
                for d in &r.defects {
                    warning(format!("Not migrated ({}): {}", d.reason, d.entry));
                }
            }
            None => {}
        }
    }
    Ok(())
}
