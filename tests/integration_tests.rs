use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use rtimeledger::db::pool::DbPool;
use rtimeledger::db::repository::RECORDS_KEY;
use rtimeledger::db::store::BlobStore;
use serde_json::json;

mod common;
use common::TestEnv;

fn save_sample_month(env: &TestEnv) {
    env.cmd()
        .args([
            "save",
            "2025-09-01",
            "-p",
            "main,09:00,12:00",
            "-p",
            "overtime,12:00,13:00",
        ])
        .assert()
        .success()
        .stdout(contains("Saved 2 period(s) for 2025/09/01."));

    env.cmd()
        .args(["save", "2025-09-02", "-p", "main,08:30,17:30"])
        .assert()
        .success();
}

#[test]
fn init_creates_the_database() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized at"));
    assert!(std::path::Path::new(&env.db).exists());
}

#[test]
fn save_and_list_a_month() {
    let env = TestEnv::new();
    env.init();
    save_sample_month(&env);

    env.cmd()
        .args(["list", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(
            contains("2025/09/01")
                .and(contains("2025/09/02"))
                .and(contains("Overtime"))
                .and(contains("08:30")),
        );
}

#[test]
fn overlapping_save_is_refused() {
    let env = TestEnv::new();
    env.init();

    env.cmd()
        .args([
            "save",
            "2025-09-01",
            "-p",
            "main,09:00,18:00",
            "-p",
            "overtime,17:00,19:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Period 1 overlaps period 0"));

    env.cmd()
        .args(["list", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(contains("No records found"));
}

#[test]
fn malformed_time_is_refused() {
    let env = TestEnv::new();
    env.init();
    env.cmd()
        .args(["save", "2025-09-01", "-p", "main,9h,12:00"])
        .assert()
        .failure()
        .stderr(contains("Malformed time"));
}

#[test]
fn edit_then_delete() {
    let env = TestEnv::new();
    env.init();
    save_sample_month(&env);

    env.cmd()
        .args(["edit", "2025-09-02", "--period", "1", "--out", "18:00"])
        .assert()
        .success()
        .stdout(contains("Period #1 updated.").and(contains("09h 30m")));

    env.cmd()
        .args(["del", "2025-09-01", "--period", "2", "--yes"])
        .assert()
        .success()
        .stdout(contains("Period #2 for 2025/09/01 has been deleted."));

    env.cmd()
        .args(["del", "2025-09-02", "-y"])
        .assert()
        .success();

    env.cmd()
        .args(["list", "--period", "2025-09-02"])
        .assert()
        .success()
        .stdout(contains("No records found"));
}

#[test]
fn stats_for_a_month() {
    let env = TestEnv::new();
    env.init();
    save_sample_month(&env);

    env.cmd()
        .args(["stats", "--month", "2025-09"])
        .assert()
        .success()
        .stdout(
            contains("Days worked       : 2")
                .and(contains("Overtime days     : 1"))
                .and(contains("Earliest clock-in : 08:30")),
        );
}

#[test]
fn clock_toggles_open_and_closed() {
    let env = TestEnv::new();
    env.init();

    env.cmd()
        .args(["clock", "--type", "ot", "--date", "2025-09-03"])
        .assert()
        .success()
        .stdout(contains("Overtime period #1 started"));

    env.cmd()
        .args(["clock", "-t", "overtime", "--date", "2025-09-03"])
        .assert()
        .success()
        .stdout(contains("Overtime period #1 closed"));

    env.cmd()
        .args(["close", "-t", "main", "--date", "2025-09-03"])
        .assert()
        .failure()
        .stderr(contains("No open main period"));
}

#[test]
fn export_then_import_into_another_database() {
    let env = TestEnv::new();
    env.init();
    save_sample_month(&env);
    let csv = env.path("ledger.csv");
    let csv = csv.to_string_lossy();

    env.cmd()
        .args(["export", "--format", "csv", "--file", &csv, "--force"])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let other = TestEnv::new();
    other.init();
    other
        .cmd()
        .args(["import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 2 new day(s)."));

    other
        .cmd()
        .args(["import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 0 new day(s).").and(contains("2 day(s) already present")));
}

#[test]
fn legacy_records_are_migrated_on_demand() {
    let env = TestEnv::new();
    env.init();
    {
        let mut pool = DbPool::new(&env.db).unwrap();
        pool.set(
            RECORDS_KEY,
            &json!([
                {"date": "2024-1-5", "type": "上班", "time": "09:00"},
                {"date": "2024-1-5", "type": "下班", "time": "18:00"},
                {"date": "2024-1-6", "type": "下班", "time": "18:00"},
            ]),
        )
        .unwrap();
    }

    env.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(
            contains("Migrated 3 legacy event(s) into 1 day(s)")
                .and(contains("clock-out without clock-in")),
        );

    env.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(contains("Migration already completed."));

    env.cmd()
        .args(["list", "--period", "2024-01"])
        .assert()
        .success()
        .stdout(contains("2024/01/05").and(contains("09h 00m")));

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"));
}

#[test]
fn invalid_date_argument() {
    let env = TestEnv::new();
    env.init();
    env.cmd()
        .args(["del", "2025-02-30", "-y"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}
