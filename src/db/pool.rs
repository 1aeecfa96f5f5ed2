//! SQLite connection wrapper (lightweight for CLI usage), used as the
//! ledger's blob store.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

fn unavailable(e: impl std::fmt::Display) -> AppError {
    AppError::StorageUnavailable(e.to_string())
}

impl BlobStore for DbPool {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(unavailable)?;

        raw.map(|s| serde_json::from_str(&s).map_err(unavailable))
            .transpose()
    }

    fn set(&mut self, key: &str, value: &Value) -> AppResult<()> {
        let text = serde_json::to_string(value)?;
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, text, Local::now().to_rfc3339()],
            )
            .map_err(unavailable)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(unavailable)?;
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.conn, operation, target, message) {
            tracing::warn!(operation, error = %e, "failed to write internal log");
        }
    }
}
