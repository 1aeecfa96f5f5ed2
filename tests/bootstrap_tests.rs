use rtimeledger::core::backup::{BackupAction, BackupLogic};
use rtimeledger::core::bootstrap::bootstrap;
use rtimeledger::core::migrate::MigrationOutcome;
use rtimeledger::db::repository::{BACKUP_KEY, RECORDS_KEY, Repository};
use rtimeledger::db::store::MemoryStore;
use serde_json::json;

mod common;

fn legacy() -> serde_json::Value {
    json!([
        {"date": "2024/01/01", "type": "上班", "time": "09:00"},
        {"date": "2024/01/01", "type": "下班", "time": "18:00"},
    ])
}

#[test]
fn first_start_backs_up_then_migrates() {
    let mut repo = Repository::new(MemoryStore::new().with_value(RECORDS_KEY, legacy()));
    let report = bootstrap(&mut repo);

    assert!(report.is_clean());
    assert_eq!(report.backup, Some(BackupAction::Refreshed(2)));
    assert!(matches!(
        report.migration,
        Some(MigrationOutcome::Migrated(_))
    ));
    assert_eq!(repo.store().raw(BACKUP_KEY), Some(&legacy()));

    let second = bootstrap(&mut repo);
    assert_eq!(second.backup, Some(BackupAction::Refreshed(1)));
    assert_eq!(second.migration, Some(MigrationOutcome::AlreadyCompleted));

    let third = bootstrap(&mut repo);
    assert_eq!(third.backup, Some(BackupAction::Unchanged));
}

#[test]
fn emptied_records_are_restored_from_backup() {
    let store = MemoryStore::new()
        .with_value(RECORDS_KEY, json!([]))
        .with_value(BACKUP_KEY, legacy());
    let mut repo = Repository::new(store);

    assert_eq!(
        BackupLogic::reconcile(&mut repo).unwrap(),
        BackupAction::Restored(2)
    );
    assert_eq!(repo.store().raw(RECORDS_KEY), Some(&legacy()));
}

#[test]
fn nothing_stored_is_a_no_op() {
    let mut repo = Repository::new(MemoryStore::new());
    assert_eq!(
        BackupLogic::reconcile(&mut repo).unwrap(),
        BackupAction::Unchanged
    );
}

#[test]
fn storage_failure_is_reported_not_raised() {
    let mut store = MemoryStore::new().with_value(RECORDS_KEY, legacy());
    store.set_fail_reads(true);
    let mut repo = Repository::new(store);

    let report = bootstrap(&mut repo);
    assert!(!report.is_clean());
    assert_eq!(report.errors.len(), 2);
    assert!(report.backup.is_none());
    assert!(report.migration.is_none());
    assert_eq!(repo.store().write_count(), 0);
}

#[test]
fn backup_file_copies_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite");
    std::fs::write(&db, b"sqlite bytes").unwrap();

    let plain = BackupLogic::backup_file(&db, &dir.path().join("copy.sqlite"), false).unwrap();
    assert_eq!(std::fs::read(&plain).unwrap(), b"sqlite bytes");

    let zipped = BackupLogic::backup_file(&db, &dir.path().join("copy2.sqlite"), true).unwrap();
    assert_eq!(zipped.extension().and_then(|e| e.to_str()), Some("zip"));
    assert!(zipped.exists());
}
