//! The record store: per-date day records and every mutation on them.
//!
//! Each mutation is a full read-modify-write of the `records` key. The
//! strict load runs first, so a storage failure aborts before anything is
//! written. Read-only accessors fail closed and see an empty ledger.

use crate::core::validator::{check_change, validate_day, validate_open_slots, validate_order};
use crate::db::repository::{LedgerSnapshot, Repository};
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::period::{Period, PeriodDraft};
use crate::models::period_type::PeriodType;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::date::{DateRange, format_date};
use crate::utils::time::format_time;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Result of a clock toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockOutcome {
    Opened { index: usize, period: Period },
    Closed { index: usize, period: Period },
}

impl ClockOutcome {
    pub fn index(&self) -> usize {
        match self {
            ClockOutcome::Opened { index, .. } | ClockOutcome::Closed { index, .. } => *index,
        }
    }

    pub fn period(&self) -> &Period {
        match self {
            ClockOutcome::Opened { period, .. } | ClockOutcome::Closed { period, .. } => period,
        }
    }
}

/// Field changes for one period. `None` leaves a field alone;
/// `clock_out: Some(None)` reopens the period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodPatch {
    pub kind: Option<PeriodType>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<Option<NaiveTime>>,
}

impl PeriodPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.clock_in.is_none() && self.clock_out.is_none()
    }

    /// An overnight period stays overnight only while its times are left
    /// alone.
    fn apply(&self, current: &Period) -> PeriodDraft {
        PeriodDraft {
            kind: self.kind.unwrap_or(current.kind),
            clock_in: Some(self.clock_in.unwrap_or(current.clock_in)),
            clock_out: self.clock_out.unwrap_or(current.clock_out),
            overnight: current.wraps() && self.clock_in.is_none() && self.clock_out.is_none(),
        }
    }
}

/// Dates added and skipped by [`Ledger::merge_days`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub added: Vec<NaiveDate>,
    pub skipped: Vec<NaiveDate>,
}

pub struct Ledger<S: BlobStore, C: Clock = SystemClock> {
    repo: Repository<S>,
    clock: C,
}

impl<S: BlobStore> Ledger<S, SystemClock> {
    pub fn with_system_clock(store: S) -> Self {
        Self::new(Repository::new(store), SystemClock)
    }
}

impl<S: BlobStore, C: Clock> Ledger<S, C> {
    pub fn new(repo: Repository<S>, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut Repository<S> {
        &mut self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    // ---------------------------
    // Reads (fail closed)
    // ---------------------------

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.repo.load_or_empty()
    }

    pub fn get_day(&self, date: NaiveDate) -> Option<DayRecord> {
        self.snapshot().days.remove(&date)
    }

    pub fn all_days(&self) -> Vec<DayRecord> {
        self.snapshot().days.into_values().collect()
    }

    pub fn days_in(&self, range: &DateRange) -> Vec<DayRecord> {
        self.snapshot()
            .days
            .into_values()
            .filter(|d| range.contains(d.date))
            .collect()
    }

    // ---------------------------
    // Clock actions
    // ---------------------------

    /// Toggle the `kind` slot of `date`: open a new period at the current
    /// time, or close the open one. Closing may wrap past midnight.
    pub fn open_period(&mut self, date: NaiveDate, kind: PeriodType) -> AppResult<ClockOutcome> {
        let mut snapshot = self.repo.load()?;
        let now = self.clock.now().time();
        let day = snapshot
            .days
            .entry(date)
            .or_insert_with(|| DayRecord::new(date));

        let outcome = if day.open_slot(kind).is_some() {
            let index = Self::close_in_day(day, kind, now)?;
            ClockOutcome::Closed {
                index,
                period: day.periods()[index].clone(),
            }
        } else {
            let period = Period::open(kind, now);
            let index = day.push(period.clone());
            ClockOutcome::Opened { index, period }
        };

        let (op, msg) = match &outcome {
            ClockOutcome::Opened { period, .. } => {
                ("clock_in", format!("{} in {}", kind, format_time(period.clock_in)))
            }
            ClockOutcome::Closed { period, .. } => (
                "clock_out",
                format!("{} {}", kind, period.span_label()),
            ),
        };
        self.commit(&snapshot, op, date, &msg)?;
        tracing::debug!(%date, %kind, index = outcome.index(), op, "clock toggle");
        Ok(outcome)
    }

    /// Close the open period of `kind`; an error when none is open.
    pub fn close_period(&mut self, date: NaiveDate, kind: PeriodType) -> AppResult<(usize, Period)> {
        let mut snapshot = self.repo.load()?;
        let now = self.clock.now().time();
        let day = snapshot
            .days
            .get_mut(&date)
            .ok_or_else(|| AppError::NoOpenPeriod(kind.to_string(), format_date(date)))?;

        let index = Self::close_in_day(day, kind, now)?;
        let period = day.periods()[index].clone();

        self.commit(
            &snapshot,
            "clock_out",
            date,
            &format!("{} {}", kind, period.span_label()),
        )?;
        Ok((index, period))
    }

    fn close_in_day(day: &mut DayRecord, kind: PeriodType, now: NaiveTime) -> AppResult<usize> {
        let mut candidate = day.clone();
        let index = candidate.close_slot(kind, now, true)?;
        if let Some(conflict) = check_change(candidate.periods(), index) {
            return Err(conflict.into());
        }
        *day = candidate;
        Ok(index)
    }

    // ---------------------------
    // Manual edits
    // ---------------------------

    /// Change fields of one period. The edited period is checked for
    /// ordering and overlap before anything is written.
    pub fn upsert_period_fields(
        &mut self,
        date: NaiveDate,
        index: usize,
        patch: &PeriodPatch,
    ) -> AppResult<Period> {
        let mut snapshot = self.repo.load()?;
        let day = snapshot
            .days
            .get_mut(&date)
            .ok_or_else(|| AppError::NoRecordForDate(format_date(date)))?;
        let current = day
            .period(index)
            .ok_or(AppError::InvalidPeriodIndex(index))?;

        let draft = patch.apply(current);
        validate_order(index, &draft)?;

        let mut drafts: Vec<PeriodDraft> = day.periods().iter().map(PeriodDraft::from).collect();
        drafts[index] = draft.clone();
        validate_open_slots(&drafts)?;
        if let Some(conflict) = check_change(&drafts, index) {
            tracing::debug!(%date, index, other = conflict.other, "edit rejected");
            return Err(conflict.into());
        }

        let period = period_from_draft(index, &draft)?;
        day.replace(index, period.clone())?;

        self.commit(
            &snapshot,
            "edit",
            date,
            &format!("period {} -> {} {}", index + 1, period.kind, period.span_label()),
        )?;
        Ok(period)
    }

    /// Remove one period. Removing the last one removes the day.
    pub fn delete_period(&mut self, date: NaiveDate, index: usize) -> AppResult<Period> {
        let mut snapshot = self.repo.load()?;
        let day = snapshot
            .days
            .get_mut(&date)
            .ok_or_else(|| AppError::NoRecordForDate(format_date(date)))?;

        let removed = day.remove(index)?;
        if day.is_empty() {
            snapshot.days.remove(&date);
        }

        self.commit(
            &snapshot,
            "del",
            date,
            &format!("period {} ({} {})", index + 1, removed.kind, removed.span_label()),
        )?;
        Ok(removed)
    }

    pub fn delete_day(&mut self, date: NaiveDate) -> AppResult<DayRecord> {
        let mut snapshot = self.repo.load()?;
        let removed = snapshot
            .days
            .remove(&date)
            .ok_or_else(|| AppError::NoRecordForDate(format_date(date)))?;

        self.commit(
            &snapshot,
            "del",
            date,
            &format!("day removed ({} periods)", removed.len()),
        )?;
        Ok(removed)
    }

    /// Replace all periods of `date`. Nothing is written unless the whole
    /// day validates.
    pub fn save(&mut self, date: NaiveDate, drafts: &[PeriodDraft]) -> AppResult<DayRecord> {
        let day = build_day(date, drafts)?;

        let mut snapshot = self.repo.load()?;
        snapshot.days.insert(date, day.clone());

        self.commit(
            &snapshot,
            "save",
            date,
            &format!("{} periods saved", day.len()),
        )?;
        Ok(day)
    }

    /// Add days whose date is not yet present. Existing dates are never
    /// touched.
    pub fn merge_days(&mut self, days: Vec<DayRecord>) -> AppResult<MergeResult> {
        let mut snapshot = self.repo.load()?;
        let mut result = MergeResult::default();

        for day in days {
            if snapshot.days.contains_key(&day.date) {
                result.skipped.push(day.date);
            } else {
                result.added.push(day.date);
                snapshot.days.insert(day.date, day);
            }
        }

        if !result.added.is_empty() {
            self.repo.save(&snapshot)?;
            self.repo.audit(
                "import",
                "",
                &format!(
                    "{} days added, {} skipped",
                    result.added.len(),
                    result.skipped.len()
                ),
            );
        }
        Ok(result)
    }

    fn commit(
        &mut self,
        snapshot: &LedgerSnapshot,
        op: &str,
        date: NaiveDate,
        msg: &str,
    ) -> AppResult<()> {
        self.repo.save(snapshot)?;
        self.repo.audit(op, &format_date(date), msg);
        Ok(())
    }
}

/// Validate a full day and turn it into a record.
pub fn build_day(date: NaiveDate, drafts: &[PeriodDraft]) -> AppResult<DayRecord> {
    validate_day(drafts)?;
    let periods = drafts
        .iter()
        .enumerate()
        .map(|(i, d)| period_from_draft(i, d))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(DayRecord::with_periods(date, periods))
}

/// Materialize a validated draft. Only an overnight draft wraps midnight.
fn period_from_draft(index: usize, draft: &PeriodDraft) -> AppResult<Period> {
    let clock_in = draft.clock_in.ok_or(AppError::MissingClockIn(index))?;
    match draft.clock_out {
        Some(out) if draft.overnight => Period::closed_overnight(draft.kind, clock_in, out),
        Some(out) => Period::closed(draft.kind, clock_in, out).map_err(|_| AppError::InvalidRange {
            index,
            clock_in: format_time(clock_in),
            clock_out: format_time(out),
        }),
        None => Ok(Period::open(draft.kind, clock_in)),
    }
}
