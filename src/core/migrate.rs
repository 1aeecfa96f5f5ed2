//! One-time conversion of single-punch records into day records.
//!
//! Legacy entries (`{date, type: 上班|下班, time}`) are grouped by
//! normalized date; the first clock-in and the first clock-out of a date
//! become one `main` period. Punches that cannot be placed are copied
//! verbatim to the `legacy_defects` key instead of being fixed or dropped.

use crate::db::repository::{LedgerSnapshot, Repository};
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::legacy_event::{LegacyEvent, LegacyKind};
use crate::models::migration_state::MigrationState;
use crate::models::period::Period;
use crate::models::period_type::PeriodType;
use crate::utils::date::{format_date, parse_date};
use crate::utils::time::normalize_to_seconds;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use std::collections::BTreeMap;

/// Why a legacy entry was not migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefectReason {
    Unreadable,
    BadDate(String),
    UnknownType(String),
    MalformedTime(String),
    DuplicatePunch,
    ClockOutWithoutClockIn,
    DateAlreadyRecorded,
}

impl std::fmt::Display for DefectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefectReason::Unreadable => write!(f, "unreadable entry"),
            DefectReason::BadDate(d) => write!(f, "invalid date '{d}'"),
            DefectReason::UnknownType(t) => write!(f, "unknown punch type '{t}'"),
            DefectReason::MalformedTime(t) => write!(f, "malformed time '{t}'"),
            DefectReason::DuplicatePunch => write!(f, "duplicate punch"),
            DefectReason::ClockOutWithoutClockIn => write!(f, "clock-out without clock-in"),
            DefectReason::DateAlreadyRecorded => write!(f, "date already has a day record"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Defect {
    pub entry: Value,
    pub reason: DefectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub legacy_events: usize,
    pub days_created: usize,
    pub open_days: usize,
    pub canonical_kept: usize,
    pub defects: Vec<Defect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    AlreadyCompleted,
    NothingToMigrate,
    Migrated(MigrationReport),
}

/// Records and defects a migration would write.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationPlan {
    pub records: Value,
    pub report: MigrationReport,
}

struct Punch {
    kind: LegacyKind,
    time: NaiveTime,
    raw: Value,
}

pub struct FormatMigrator;

impl FormatMigrator {
    /// Run once. After the flag is set, later calls read only the flag.
    ///
    /// On any failure the records and the flag stay as they were.
    pub fn run<S: BlobStore>(repo: &mut Repository<S>) -> AppResult<MigrationOutcome> {
        let state = repo.migration_state().map_err(failure)?;
        if state.is_completed() {
            tracing::debug!("migration already completed, skipping");
            return Ok(MigrationOutcome::AlreadyCompleted);
        }

        let raw = match repo.raw_records().map_err(failure)? {
            Some(raw) => raw,
            None => {
                repo.set_migration_state(MigrationState::Completed)
                    .map_err(failure)?;
                return Ok(MigrationOutcome::NothingToMigrate);
            }
        };

        let plan = Self::plan(&raw).map_err(failure)?;
        if plan.report.legacy_events == 0 {
            repo.set_migration_state(MigrationState::Completed)
                .map_err(failure)?;
            tracing::info!("no legacy records, migration flag set");
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        let defects: Vec<Value> = plan.report.defects.iter().map(|d| d.entry.clone()).collect();
        repo.append_defects(&defects).map_err(failure)?;
        repo.write_raw_records(&plan.records).map_err(failure)?;
        repo.set_migration_state(MigrationState::Completed)
            .map_err(failure)?;

        let report = plan.report;
        repo.audit(
            "migration_applied",
            "records",
            &format!(
                "{} legacy events -> {} days ({} open), {} defects",
                report.legacy_events,
                report.days_created,
                report.open_days,
                report.defects.len()
            ),
        );
        tracing::info!(
            days = report.days_created,
            defects = report.defects.len(),
            "legacy records migrated"
        );
        Ok(MigrationOutcome::Migrated(report))
    }

    /// Compute the migrated `records` value without touching storage.
    pub fn plan(raw: &Value) -> AppResult<MigrationPlan> {
        let entries = raw.as_array().ok_or_else(|| {
            AppError::MigrationFailure("stored records are not an array".into())
        })?;

        let mut report = MigrationReport::default();
        let mut snapshot = LedgerSnapshot::default();
        let mut punches: BTreeMap<NaiveDate, Vec<Punch>> = BTreeMap::new();

        for (i, entry) in entries.iter().enumerate() {
            let obj = entry.as_object().ok_or_else(|| {
                AppError::MigrationFailure(format!("record {i} is not an object"))
            })?;

            if obj.contains_key("periods") {
                match canonical_day(entry) {
                    Some(day) if !snapshot.days.contains_key(&day.date) => {
                        report.canonical_kept += 1;
                        snapshot.days.insert(day.date, day);
                    }
                    _ => snapshot.foreign.push(entry.clone()),
                }
                continue;
            }

            if !(obj.contains_key("type") && obj.contains_key("time")) {
                snapshot.foreign.push(entry.clone());
                continue;
            }

            report.legacy_events += 1;
            match read_punch(entry) {
                Ok((date, punch)) => punches.entry(date).or_default().push(punch),
                Err(reason) => report.defects.push(Defect {
                    entry: entry.clone(),
                    reason,
                }),
            }
        }

        for (date, day_punches) in punches {
            if snapshot.days.contains_key(&date) {
                report.defects.extend(day_punches.into_iter().map(|p| Defect {
                    entry: p.raw,
                    reason: DefectReason::DateAlreadyRecorded,
                }));
                continue;
            }

            let (day, defects) = build_day(date, day_punches)?;
            report.defects.extend(defects);
            if let Some(day) = day {
                report.days_created += 1;
                if day.has_open_period() {
                    report.open_days += 1;
                }
                snapshot.days.insert(date, day);
            }
        }

        for d in &report.defects {
            tracing::warn!(reason = %d.reason, entry = %d.entry, "legacy entry not migrated");
        }

        let records = snapshot.encode()?;
        Ok(MigrationPlan { records, report })
    }
}

fn failure(e: AppError) -> AppError {
    match e {
        AppError::MigrationFailure(_) => e,
        other => AppError::MigrationFailure(other.to_string()),
    }
}

/// Existing day record, re-read so its date and times come out normalized;
/// `None` when it cannot be read as one.
fn canonical_day(entry: &Value) -> Option<DayRecord> {
    serde_json::from_value(entry.clone()).ok()
}

fn read_punch(entry: &Value) -> Result<(NaiveDate, Punch), DefectReason> {
    let event: LegacyEvent =
        serde_json::from_value(entry.clone()).map_err(|_| DefectReason::Unreadable)?;

    let date = parse_date(&event.date).ok_or_else(|| DefectReason::BadDate(event.date.clone()))?;
    let kind = event
        .legacy_kind()
        .ok_or_else(|| DefectReason::UnknownType(event.kind.clone()))?;
    let time = normalize_to_seconds(&event.time)
        .map_err(|_| DefectReason::MalformedTime(event.time.clone()))?;

    Ok((
        date,
        Punch {
            kind,
            time,
            raw: entry.clone(),
        },
    ))
}

/// First clock-in and first clock-out win; the single pair may wrap past
/// midnight.
fn build_day(date: NaiveDate, punches: Vec<Punch>) -> AppResult<(Option<DayRecord>, Vec<Defect>)> {
    let mut clock_in: Option<NaiveTime> = None;
    let mut clock_out: Option<NaiveTime> = None;
    let mut defects = Vec::new();
    let mut outs = Vec::new();

    for p in punches {
        let slot = match p.kind {
            LegacyKind::ClockIn => &mut clock_in,
            LegacyKind::ClockOut => &mut clock_out,
        };
        if slot.is_none() {
            *slot = Some(p.time);
            if p.kind == LegacyKind::ClockOut {
                outs.push(p.raw);
            }
        } else {
            defects.push(Defect {
                entry: p.raw,
                reason: DefectReason::DuplicatePunch,
            });
        }
    }

    let Some(clock_in) = clock_in else {
        defects.extend(outs.into_iter().map(|raw| Defect {
            entry: raw,
            reason: DefectReason::ClockOutWithoutClockIn,
        }));
        tracing::debug!(date = %format_date(date), "no clock-in, day skipped");
        return Ok((None, defects));
    };

    let mut period = Period::open(PeriodType::Main, clock_in);
    if let Some(out) = clock_out {
        period.close_at(out, true)?;
    }
    Ok((Some(DayRecord::with_periods(date, vec![period])), defects))
}
