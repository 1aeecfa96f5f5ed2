//! Key-value blob store abstraction the ledger persists into.

use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::HashMap;

/// Synchronous key → JSON value store.
///
/// Every `set` replaces the whole value of a key in one step; there are no
/// partial writes.
pub trait BlobStore {
    fn get(&self, key: &str) -> AppResult<Option<Value>>;
    fn set(&mut self, key: &str, value: &Value) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;

    /// Record an operation in the backend's audit trail, if it keeps one.
    fn audit(&mut self, _operation: &str, _target: &str, _message: &str) {}
}

/// In-process store. Failure switches let callers exercise the
/// `StorageUnavailable` paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: HashMap<String, Value>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
    audit_trail: Vec<(String, String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set`/`remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn audit_trail(&self) -> &[(String, String, String)] {
        &self.audit_trail
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        if self.fail_reads {
            return Err(AppError::StorageUnavailable(format!("read of '{key}' failed")));
        }
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::StorageUnavailable(format!("write of '{key}' failed")));
        }
        self.data.insert(key.to_string(), value.clone());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::StorageUnavailable(format!("remove of '{key}' failed")));
        }
        self.data.remove(key);
        self.writes += 1;
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        self.audit_trail
            .push((operation.into(), target.into(), message.into()));
    }
}
