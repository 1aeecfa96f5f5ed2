//! Startup sequence: backup reconciliation, then the format migration.

use crate::core::backup::{BackupAction, BackupLogic};
use crate::core::migrate::{FormatMigrator, MigrationOutcome};
use crate::db::repository::Repository;
use crate::db::store::BlobStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    pub backup: Option<BackupAction>,
    pub migration: Option<MigrationOutcome>,
    pub errors: Vec<String>,
}

impl BootstrapReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Never fails: a step that errors is logged and recorded in the report,
/// and the ledger keeps whatever state it had.
pub fn bootstrap<S: BlobStore>(repo: &mut Repository<S>) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    match BackupLogic::reconcile(repo) {
        Ok(action) => report.backup = Some(action),
        Err(e) => {
            tracing::warn!(error = %e, "backup reconciliation skipped");
            report.errors.push(e.to_string());
        }
    }

    match FormatMigrator::run(repo) {
        Ok(outcome) => report.migration = Some(outcome),
        Err(e) => {
            tracing::warn!(error = %e, "migration aborted, will retry on next start");
            report.errors.push(e.to_string());
        }
    }

    report
}
