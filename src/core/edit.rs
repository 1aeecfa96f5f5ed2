//! Interactive editing of one day, with delayed rollback of conflicting
//! edits.
//!
//! A time change that makes a period overlap another one is kept on screen
//! for a short while and then reverted. The revert is a scheduled entry
//! keyed by period index: a newer edit of the same period replaces it, so
//! a stale rollback can never clobber a later valid value.

use crate::core::ledger::Ledger;
use crate::core::validator::{Conflict, check_change};
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::period::PeriodDraft;
use crate::models::period_type::PeriodType;
use crate::utils::clock::Clock;
use crate::utils::time::to_seconds;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRollback {
    pub index: usize,
    pub due: NaiveDateTime,
    pub restore: PeriodDraft,
    pub conflict: Conflict,
}

#[derive(Debug, Clone)]
pub struct RollbackQueue {
    delay: Duration,
    pending: BTreeMap<usize, PendingRollback>,
}

impl RollbackQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a revert of `index` to `restore`. Any earlier entry for the
    /// same index is cancelled and returned.
    pub fn schedule(
        &mut self,
        index: usize,
        restore: PeriodDraft,
        conflict: Conflict,
        now: NaiveDateTime,
    ) -> Option<PendingRollback> {
        let entry = PendingRollback {
            index,
            due: now + self.delay,
            restore,
            conflict,
        };
        tracing::debug!(index, due = %entry.due, "rollback scheduled");
        self.pending.insert(index, entry)
    }

    pub fn cancel(&mut self, index: usize) -> Option<PendingRollback> {
        self.pending.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&PendingRollback> {
        self.pending.get(&index)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every entry due at `now`.
    pub fn take_due(&mut self, now: NaiveDateTime) -> Vec<PendingRollback> {
        let due: Vec<usize> = self
            .pending
            .values()
            .filter(|p| p.due <= now)
            .map(|p| p.index)
            .collect();
        due.into_iter()
            .filter_map(|i| self.pending.remove(&i))
            .collect()
    }

    /// Period `index` was removed: drop its entry and renumber the rest.
    /// Entries whose conflict was with the removed period are taken out of
    /// the queue and returned, renumbered.
    pub fn period_removed(&mut self, index: usize) -> Vec<PendingRollback> {
        let shift = |i: usize| if i > index { i - 1 } else { i };
        let mut orphaned = Vec::new();

        for mut p in std::mem::take(&mut self.pending).into_values() {
            if p.index == index {
                continue;
            }
            let partner_removed = p.conflict.other == index;
            p.index = shift(p.index);
            p.conflict.changed = shift(p.conflict.changed);
            p.conflict.other = shift(p.conflict.other);
            if partner_removed {
                orphaned.push(p);
            } else {
                self.pending.insert(p.index, p);
            }
        }
        orphaned
    }

    fn reinstate(&mut self, entry: PendingRollback) {
        self.pending.insert(entry.index, entry);
    }
}

/// Working copy of one day's periods.
#[derive(Debug, Clone)]
pub struct EditSession {
    date: NaiveDate,
    periods: Vec<PeriodDraft>,
    rollbacks: RollbackQueue,
}

impl EditSession {
    pub fn new(date: NaiveDate, rollback_delay: Duration) -> Self {
        Self {
            date,
            periods: Vec::new(),
            rollbacks: RollbackQueue::new(rollback_delay),
        }
    }

    pub fn from_day(day: &DayRecord, rollback_delay: Duration) -> Self {
        let mut session = Self::new(day.date, rollback_delay);
        session.periods = day.periods().iter().map(PeriodDraft::from).collect();
        session
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn periods(&self) -> &[PeriodDraft] {
        &self.periods
    }

    pub fn rollbacks(&self) -> &RollbackQueue {
        &self.rollbacks
    }

    pub fn add_period(&mut self, kind: PeriodType) -> usize {
        self.periods.push(PeriodDraft::new(kind));
        self.periods.len() - 1
    }

    pub fn set_type(&mut self, index: usize, kind: PeriodType) -> AppResult<()> {
        self.draft_mut(index)?.kind = kind;
        Ok(())
    }

    pub fn set_clock_in(
        &mut self,
        index: usize,
        clock_in: Option<NaiveTime>,
        now: NaiveDateTime,
    ) -> AppResult<Option<Conflict>> {
        self.change_times(index, now, |d| d.clock_in = clock_in)
    }

    pub fn set_clock_out(
        &mut self,
        index: usize,
        clock_out: Option<NaiveTime>,
        now: NaiveDateTime,
    ) -> AppResult<Option<Conflict>> {
        self.change_times(index, now, |d| d.clock_out = clock_out)
    }

    pub fn remove_period(&mut self, index: usize) -> AppResult<PeriodDraft> {
        if index >= self.periods.len() {
            return Err(AppError::InvalidPeriodIndex(index));
        }
        let orphaned = self.rollbacks.period_removed(index);
        let removed = self.periods.remove(index);

        // A rejected edit stays scheduled only while it still overlaps.
        for mut p in orphaned {
            if let Some(c) = check_change(&self.periods, p.index) {
                p.conflict = c;
                self.rollbacks.reinstate(p);
            }
        }
        Ok(removed)
    }

    fn draft_mut(&mut self, index: usize) -> AppResult<&mut PeriodDraft> {
        self.periods
            .get_mut(index)
            .ok_or(AppError::InvalidPeriodIndex(index))
    }

    fn change_times<F>(&mut self, index: usize, now: NaiveDateTime, apply: F) -> AppResult<Option<Conflict>>
    where
        F: FnOnce(&mut PeriodDraft),
    {
        let before = self.draft_mut(index)?.clone();
        // The last accepted value survives a chain of conflicting edits.
        let restore = match self.rollbacks.cancel(index) {
            Some(pending) => pending.restore,
            None => before,
        };

        apply(self.draft_mut(index)?);
        // edits never keep an overnight span
        self.draft_mut(index)?.overnight = false;

        let conflict = check_change(&self.periods, index);
        if let Some(c) = conflict {
            self.rollbacks.schedule(index, restore, c, now);
        }
        Ok(conflict)
    }

    /// Apply the rollbacks due at `now`; returns the reverted indexes.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<usize> {
        let mut reverted = Vec::new();
        for p in self.rollbacks.take_due(now) {
            if let Some(slot) = self.periods.get_mut(p.index) {
                slot.clock_in = p.restore.clock_in;
                slot.clock_out = p.restore.clock_out;
                slot.overnight = p.restore.overnight;
                reverted.push(p.index);
            }
        }
        reverted
    }

    /// (main, overtime, total) of the periods with both endpoints in order.
    /// An overnight period counts its full span.
    pub fn totals(&self) -> (Duration, Duration, Duration) {
        let (main, overtime) = self.periods.iter().fold(
            (Duration::zero(), Duration::zero()),
            |(m, o), d| match (d.clock_in, d.clock_out) {
                (Some(i), Some(out)) if d.overnight || to_seconds(out) >= to_seconds(i) => {
                    let secs = Duration::seconds((to_seconds(out) - to_seconds(i)).rem_euclid(86_400));
                    match d.kind {
                        PeriodType::Main => (m + secs, o),
                        PeriodType::Overtime => (m, o + secs),
                    }
                }
                _ => (m, o),
            },
        );
        (main, overtime, main + overtime)
    }

    /// Write the session through the ledger's full-day save.
    pub fn commit<S: BlobStore, C: Clock>(&self, ledger: &mut Ledger<S, C>) -> AppResult<DayRecord> {
        ledger.save(self.date, &self.periods)
    }
}
