// src/export/logic.rs

use crate::core::ledger::{Ledger, build_day};
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use crate::export::csv::{read_csv, write_csv};
use crate::export::fs_utils::ensure_writable;
use crate::export::json::write_json;
use crate::export::model::{PeriodRow, rows_from_days};
use crate::export::range::parse_range;
use crate::export::{ExportFormat, notify_export_success};
use crate::models::day_record::DayRecord;
use crate::models::period::PeriodDraft;
use crate::models::period_type::PeriodType;
use crate::ui::messages::{info, warning};
use crate::utils::clock::Clock;
use crate::utils::date::{format_date, parse_date};
use crate::utils::time::normalize_to_seconds;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the day records in `range` (`None` or `"all"` for everything).
    /// Returns the number of days written; nothing is written when the
    /// range is empty.
    pub fn export<S: BlobStore, C: Clock>(
        ledger: &mut Ledger<S, C>,
        format: ExportFormat,
        path: &Path,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let days = match range.map(parse_range).transpose()?.flatten() {
            Some(r) => ledger.days_in(&r),
            None => ledger.all_days(),
        };

        if days.is_empty() {
            warning("No records found for selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => {
                info(format!("Exporting to CSV: {}", path.display()));
                write_csv(path, &rows_from_days(&days))?;
                notify_export_success("CSV", path);
            }
            ExportFormat::Json => {
                info(format!("Exporting to JSON: {}", path.display()));
                write_json(path, &days)?;
                notify_export_success("JSON", path);
            }
        }

        ledger.repository_mut().audit(
            "export",
            &path.to_string_lossy(),
            &format!("{} days as {}", days.len(), format.as_str()),
        );
        Ok(days.len())
    }
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<NaiveDate>,
    pub skipped_existing: Vec<NaiveDate>,
    /// Human-readable reason per rejected line or date.
    pub rejected: Vec<String>,
}

pub struct ImportLogic;

impl ImportLogic {
    /// Read a CSV produced by `export`, rebuild day records and add the
    /// dates not yet present. Existing dates are left alone.
    pub fn import<S: BlobStore, C: Clock>(
        ledger: &mut Ledger<S, C>,
        path: &Path,
    ) -> AppResult<ImportReport> {
        if !path.exists() {
            return Err(AppError::Import(format!("file not found: {}", path.display())));
        }

        let mut report = ImportReport::default();
        let mut grouped: BTreeMap<NaiveDate, Vec<PeriodDraft>> = BTreeMap::new();

        for (line, row) in read_csv(path)? {
            match row.and_then(|r| parse_row(&r)) {
                Ok((date, draft)) => grouped.entry(date).or_default().push(draft),
                Err(e) => report.rejected.push(format!("line {line}: {e}")),
            }
        }

        let mut days: Vec<DayRecord> = Vec::new();
        for (date, drafts) in grouped {
            match build_day(date, &drafts) {
                Ok(day) => days.push(day),
                Err(e) => report.rejected.push(format!("{}: {e}", format_date(date))),
            }
        }

        let merged = ledger.merge_days(days)?;
        report.added = merged.added;
        report.skipped_existing = merged.skipped;
        Ok(report)
    }
}

fn parse_row(row: &PeriodRow) -> Result<(NaiveDate, PeriodDraft), String> {
    let date = parse_date(&row.date).ok_or_else(|| format!("invalid date '{}'", row.date))?;
    let kind = PeriodType::pt_from_str(&row.kind)
        .ok_or_else(|| format!("invalid period type '{}'", row.kind))?;
    let clock_in = parse_cell(&row.clock_in)?;
    let clock_out = parse_cell(&row.clock_out)?;
    // An exported overnight period carries its duration; a bare inverted
    // pair is still rejected.
    let overnight = !row.duration.trim().is_empty()
        && matches!((clock_in, clock_out), (Some(i), Some(o)) if o < i);

    Ok((
        date,
        PeriodDraft {
            kind,
            clock_in,
            clock_out,
            overnight,
        },
    ))
}

fn parse_cell(v: &str) -> Result<Option<NaiveTime>, String> {
    if v.trim().is_empty() {
        return Ok(None);
    }
    normalize_to_seconds(v).map(Some).map_err(|e| e.to_string())
}
