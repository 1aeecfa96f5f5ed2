use chrono::Duration;
use rtimeledger::core::ledger::Ledger;
use rtimeledger::db::log::load_log;
use rtimeledger::db::pool::DbPool;
use rtimeledger::db::repository::{RECORDS_KEY, Repository};
use rtimeledger::db::store::BlobStore;
use rtimeledger::models::period_type::PeriodType;
use rtimeledger::utils::clock::FixedClock;
use serde_json::json;

mod common;
use common::{at, d};

#[test]
fn kv_set_get_remove() {
    let mut pool = DbPool::in_memory().unwrap();
    assert_eq!(pool.get("k").unwrap(), None);

    pool.set("k", &json!([1, 2])).unwrap();
    pool.set("k", &json!({"replaced": true})).unwrap();
    assert_eq!(pool.get("k").unwrap(), Some(json!({"replaced": true})));

    pool.remove("k").unwrap();
    assert_eq!(pool.get("k").unwrap(), None);
}

#[test]
fn ledger_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite").to_string_lossy().to_string();
    let day = d(2025, 9, 1);

    {
        let clock = FixedClock::new(at(day, "09:00:00"));
        let mut ledger = Ledger::new(Repository::new(DbPool::new(&db).unwrap()), &clock);
        ledger.open_period(day, PeriodType::Main).unwrap();
        clock.advance(Duration::hours(8));
        ledger.open_period(day, PeriodType::Main).unwrap();
    }

    let pool = DbPool::new(&db).unwrap();
    let stored = pool.get(RECORDS_KEY).unwrap().unwrap();
    assert_eq!(stored[0]["date"], "2025/09/01");
    assert_eq!(stored[0]["totalWorkTime"], "08:00:00");

    let ops: Vec<String> = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .collect();
    assert_eq!(ops, vec!["clock_in", "clock_out"]);
}
