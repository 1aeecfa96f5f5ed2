//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Migration failed: {0}")]
    MigrationFailure(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Malformed time (expected HH:MM or HH:MM:SS): {0}")]
    MalformedTime(String),

    #[error("Invalid period type: {0}")]
    InvalidPeriodType(String),

    // ---------------------------
    // Ledger rules
    // ---------------------------
    #[error("Period {index}: clock-out {clock_out} is earlier than clock-in {clock_in}")]
    InvalidRange {
        index: usize,
        clock_in: String,
        clock_out: String,
    },

    #[error("Period {changed} overlaps period {other}")]
    PeriodConflict { changed: usize, other: usize },

    #[error("Periods {first} and {second} are both open {kind} periods")]
    MultipleOpenPeriods {
        kind: String,
        first: usize,
        second: usize,
    },

    #[error("Period {0} has no clock-in time")]
    MissingClockIn(usize),

    #[error("Invalid period index: {0}")]
    InvalidPeriodIndex(usize),

    #[error("No open {0} period for {1}")]
    NoOpenPeriod(String, String),

    #[error("No record found for date {0}")]
    NoRecordForDate(String),

    #[error("A day needs at least one period")]
    EmptyDay,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export / import errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Validation failures are recovered at the edit boundary; everything
    /// else is an operational failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidRange { .. }
                | AppError::PeriodConflict { .. }
                | AppError::MissingClockIn(_)
                | AppError::EmptyDay
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
