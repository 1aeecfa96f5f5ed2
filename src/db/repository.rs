//! Typed access to the ledger keys of a [`BlobStore`].

use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::migration_state::MigrationState;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

pub const RECORDS_KEY: &str = "records";
pub const MIGRATED_KEY: &str = "migrated";
pub const BACKUP_KEY: &str = "records_backup";
pub const DEFECTS_KEY: &str = "legacy_defects";

/// Decoded content of the `records` key.
///
/// `foreign` holds entries that are not canonical day records (legacy
/// punches, hand-edited garbage, duplicate dates). They are written back
/// untouched after the canonical days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    pub days: BTreeMap<NaiveDate, DayRecord>,
    pub foreign: Vec<Value>,
}

impl LedgerSnapshot {
    /// Decode a raw `records` array. Non-array input is rejected.
    pub fn decode(raw: &Value) -> AppResult<Self> {
        let entries = raw.as_array().ok_or_else(|| {
            AppError::StorageUnavailable(format!("'{RECORDS_KEY}' is not an array"))
        })?;

        let mut snapshot = Self::default();
        for entry in entries {
            let decoded = if entry.get("periods").is_some() {
                serde_json::from_value::<DayRecord>(entry.clone()).ok()
            } else {
                None
            };

            match decoded {
                Some(day) if !snapshot.days.contains_key(&day.date) => {
                    snapshot.days.insert(day.date, day);
                }
                _ => snapshot.foreign.push(entry.clone()),
            }
        }
        Ok(snapshot)
    }

    /// Days sorted by date, then foreign entries.
    pub fn encode(&self) -> AppResult<Value> {
        let mut out = Vec::with_capacity(self.days.len() + self.foreign.len());
        for day in self.days.values() {
            out.push(serde_json::to_value(day)?);
        }
        out.extend(self.foreign.iter().cloned());
        Ok(Value::Array(out))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.foreign.is_empty()
    }
}

pub struct Repository<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn raw_records(&self) -> AppResult<Option<Value>> {
        self.store.get(RECORDS_KEY)
    }

    pub fn write_raw_records(&mut self, value: &Value) -> AppResult<()> {
        self.store.set(RECORDS_KEY, value)
    }

    /// Strict load: storage errors propagate. Used before any write.
    pub fn load(&self) -> AppResult<LedgerSnapshot> {
        match self.raw_records()? {
            Some(raw) => LedgerSnapshot::decode(&raw),
            None => Ok(LedgerSnapshot::default()),
        }
    }

    /// Read-only callers get an empty ledger when storage fails.
    pub fn load_or_empty(&self) -> LedgerSnapshot {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "records unreadable, treating ledger as empty");
            LedgerSnapshot::default()
        })
    }

    pub fn save(&mut self, snapshot: &LedgerSnapshot) -> AppResult<()> {
        let value = snapshot.encode()?;
        self.write_raw_records(&value)
    }

    pub fn migration_state(&self) -> AppResult<MigrationState> {
        Ok(MigrationState::from_flag(self.store.get(MIGRATED_KEY)?.as_ref()))
    }

    pub fn set_migration_state(&mut self, state: MigrationState) -> AppResult<()> {
        match state {
            MigrationState::Completed => self.store.set(MIGRATED_KEY, &Value::Bool(true)),
            MigrationState::NotRun => self.store.remove(MIGRATED_KEY),
        }
    }

    pub fn backup(&self) -> AppResult<Option<Value>> {
        self.store.get(BACKUP_KEY)
    }

    pub fn set_backup(&mut self, value: &Value) -> AppResult<()> {
        self.store.set(BACKUP_KEY, value)
    }

    pub fn defects(&self) -> AppResult<Vec<Value>> {
        Ok(match self.store.get(DEFECTS_KEY)? {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    /// Append entries not already present. Returns how many were added.
    pub fn append_defects(&mut self, entries: &[Value]) -> AppResult<usize> {
        let mut current = self.defects()?;
        let before = current.len();
        for e in entries {
            if !current.contains(e) {
                current.push(e.clone());
            }
        }
        let added = current.len() - before;
        if added > 0 {
            self.store.set(DEFECTS_KEY, &Value::Array(current))?;
        }
        Ok(added)
    }

    pub fn audit(&mut self, operation: &str, target: &str, message: &str) {
        self.store.audit(operation, target, message);
    }
}
