#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rtimeledger::core::ledger::Ledger;
use rtimeledger::db::repository::Repository;
use rtimeledger::db::store::MemoryStore;
use rtimeledger::utils::clock::FixedClock;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Binary under test, with HOME pointed at `home` so no real config is read.
pub fn rtl(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rtimeledger");
    cmd.env("HOME", home).env("NO_COLOR", "1");
    cmd
}

/// Temp home directory plus a database path inside it.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir
            .path()
            .join("ledger.sqlite")
            .to_string_lossy()
            .to_string();
        Self { dir, db }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = rtl(self.dir.path());
        cmd.args(["--db", &self.db]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn t(s: &str) -> NaiveTime {
    rtimeledger::utils::time::normalize_to_seconds(s).expect("valid time")
}

pub fn at(date: NaiveDate, time: &str) -> NaiveDateTime {
    date.and_time(t(time))
}

pub fn memory_ledger(now: NaiveDateTime) -> Ledger<MemoryStore, FixedClock> {
    Ledger::new(Repository::new(MemoryStore::new()), FixedClock::new(now))
}

pub fn ledger_over(store: MemoryStore, now: NaiveDateTime) -> Ledger<MemoryStore, FixedClock> {
    Ledger::new(Repository::new(store), FixedClock::new(now))
}
