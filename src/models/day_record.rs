use super::period::Period;
use super::period_type::PeriodType;
use super::serde_fmt;
use crate::errors::{AppError, AppResult};
use crate::utils::date::{format_date, parse_date};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Index of the in-progress period of each type, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenSlots {
    main: Option<usize>,
    overtime: Option<usize>,
}

impl OpenSlots {
    pub fn get(&self, kind: PeriodType) -> Option<usize> {
        match kind {
            PeriodType::Main => self.main,
            PeriodType::Overtime => self.overtime,
        }
    }

    fn set(&mut self, kind: PeriodType, idx: Option<usize>) {
        match kind {
            PeriodType::Main => self.main = idx,
            PeriodType::Overtime => self.overtime = idx,
        }
    }

    /// Rebuild from the period list. With several open periods of one type
    /// (possible in hand-edited data) the latest one owns the slot.
    fn rebuild(periods: &[Period]) -> Self {
        let mut slots = Self::default();
        for (i, p) in periods.iter().enumerate() {
            if p.is_open() {
                slots.set(p.kind, Some(i));
            }
        }
        slots
    }
}

/// Canonical aggregate of all periods of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDay", into = "StoredDay")]
pub struct DayRecord {
    pub date: NaiveDate,
    periods: Vec<Period>,
    total_work_time: Option<Duration>,
    open_slots: OpenSlots,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            periods: Vec::new(),
            total_work_time: None,
            open_slots: OpenSlots::default(),
        }
    }

    pub fn with_periods(date: NaiveDate, periods: Vec<Period>) -> Self {
        let mut day = Self::new(date);
        day.periods = periods;
        day.refresh();
        day
    }

    pub fn date_str(&self) -> String {
        format_date(self.date)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn period(&self, idx: usize) -> Option<&Period> {
        self.periods.get(idx)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn total_work_time(&self) -> Option<Duration> {
        self.total_work_time
    }

    pub fn open_slot(&self, kind: PeriodType) -> Option<usize> {
        self.open_slots.get(kind)
    }

    pub fn open_period(&self, kind: PeriodType) -> Option<&Period> {
        self.open_slot(kind).and_then(|i| self.periods.get(i))
    }

    pub fn has_open_period(&self) -> bool {
        PeriodType::ALL.iter().any(|k| self.open_slot(*k).is_some())
    }

    pub fn complete_periods(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter().filter(|p| p.is_complete())
    }

    /// Append a period, returning its index.
    pub fn push(&mut self, period: Period) -> usize {
        self.periods.push(period);
        self.refresh();
        self.periods.len() - 1
    }

    /// Close the open period of `kind` at `clock_out`.
    pub fn close_slot(
        &mut self,
        kind: PeriodType,
        clock_out: NaiveTime,
        allow_wrap: bool,
    ) -> AppResult<usize> {
        let idx = self
            .open_slot(kind)
            .ok_or_else(|| AppError::NoOpenPeriod(kind.to_string(), self.date_str()))?;
        self.periods[idx].close_at(clock_out, allow_wrap)?;
        self.refresh();
        Ok(idx)
    }

    pub fn replace(&mut self, idx: usize, period: Period) -> AppResult<()> {
        let slot = self
            .periods
            .get_mut(idx)
            .ok_or(AppError::InvalidPeriodIndex(idx))?;
        *slot = period;
        self.refresh();
        Ok(())
    }

    pub fn remove(&mut self, idx: usize) -> AppResult<Period> {
        if idx >= self.periods.len() {
            return Err(AppError::InvalidPeriodIndex(idx));
        }
        let removed = self.periods.remove(idx);
        self.refresh();
        Ok(removed)
    }

    /// Sum of all period durations; `None` when no period has one.
    pub fn recompute_total(&mut self) {
        self.total_work_time = self
            .periods
            .iter()
            .filter_map(|p| p.duration)
            .reduce(|a, b| a + b);
    }

    pub fn total_by_type(&self, kind: PeriodType) -> Duration {
        self.periods
            .iter()
            .filter(|p| p.kind == kind)
            .filter_map(|p| p.duration)
            .fold(Duration::zero(), |a, b| a + b)
    }

    /// Total including the elapsed part of open periods.
    pub fn live_total(&self, now: NaiveTime) -> Duration {
        self.periods
            .iter()
            .fold(Duration::zero(), |acc, p| acc + p.live_duration(now))
    }

    /// (main, overtime) including open periods.
    pub fn live_totals_by_type(&self, now: NaiveTime) -> (Duration, Duration) {
        self.periods
            .iter()
            .fold((Duration::zero(), Duration::zero()), |(m, o), p| {
                let d = p.live_duration(now);
                match p.kind {
                    PeriodType::Main => (m + d, o),
                    PeriodType::Overtime => (m, o + d),
                }
            })
    }

    fn refresh(&mut self) {
        self.recompute_total();
        self.open_slots = OpenSlots::rebuild(&self.periods);
    }
}

/// On-disk shape of a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDay {
    date: String,
    periods: Vec<Period>,
    #[serde(with = "serde_fmt::duration_opt", default)]
    total_work_time: Option<Duration>,
}

impl TryFrom<StoredDay> for DayRecord {
    type Error = String;

    fn try_from(raw: StoredDay) -> Result<Self, Self::Error> {
        let date = parse_date(&raw.date).ok_or_else(|| format!("invalid date '{}'", raw.date))?;
        let mut periods = raw.periods;
        // Stored durations are not authoritative.
        for p in periods.iter_mut() {
            p.recompute(true).map_err(|e| e.to_string())?;
        }
        Ok(DayRecord::with_periods(date, periods))
    }
}

impl From<DayRecord> for StoredDay {
    fn from(day: DayRecord) -> Self {
        StoredDay {
            date: format_date(day.date),
            periods: day.periods,
            total_work_time: day.total_work_time,
        }
    }
}
