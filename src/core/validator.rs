//! Overlap and ordering rules for the periods of one day.
//!
//! Only fully bounded periods take part in overlap checks; an open period
//! never conflicts. Intervals are compared at minute resolution and
//! touching endpoints (`a.end == b.start`) are allowed. A period closed
//! past midnight runs to `end + 1440` and is also compared against the
//! other periods shifted by one day.

use crate::errors::{AppError, AppResult};
use crate::models::period::{Period, PeriodDraft};
use crate::utils::time::{format_time, to_seconds};

/// Anything with an optional minute-of-day interval.
pub trait Span {
    fn span(&self) -> Option<(i64, i64)>;
}

impl Span for Period {
    fn span(&self) -> Option<(i64, i64)> {
        self.minute_range()
    }
}

impl Span for PeriodDraft {
    fn span(&self) -> Option<(i64, i64)> {
        self.minute_range()
    }
}

/// `changed` overlaps `other` (both are indexes into the checked list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub changed: usize,
    pub other: usize,
}

impl From<Conflict> for AppError {
    fn from(c: Conflict) -> Self {
        AppError::PeriodConflict {
            changed: c.changed,
            other: c.other,
        }
    }
}

const DAY_MINUTES: i64 = 1440;

pub fn overlaps(a: (i64, i64), b: (i64, i64)) -> bool {
    [0, DAY_MINUTES, -DAY_MINUTES]
        .iter()
        .any(|shift| a.0 < b.1 + shift && b.0 + shift < a.1)
}

/// A period's clock-out may not precede its clock-in. Edits never create
/// an overnight span; only a stored overnight period keeps one.
pub fn validate_order(index: usize, draft: &PeriodDraft) -> AppResult<()> {
    if let (Some(clock_in), Some(clock_out)) = (draft.clock_in, draft.clock_out)
        && !draft.overnight
        && to_seconds(clock_out) < to_seconds(clock_in)
    {
        return Err(AppError::InvalidRange {
            index,
            clock_in: format_time(clock_in),
            clock_out: format_time(clock_out),
        });
    }
    Ok(())
}

/// Compare the period at `changed` against every other bounded period and
/// report the first overlap in list order.
pub fn check_change<T: Span>(periods: &[T], changed: usize) -> Option<Conflict> {
    let target = periods.get(changed)?.span()?;

    periods
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != changed)
        .find_map(|(i, p)| {
            p.span()
                .filter(|other| overlaps(target, *other))
                .map(|_| Conflict { changed, other: i })
        })
}

/// Pairwise check over the whole day.
///
/// Bounded periods are sorted by start; the first overlapping `i < j` pair
/// is reported with `changed` set to the later-starting period.
pub fn find_conflict<T: Span>(periods: &[T]) -> Option<Conflict> {
    let mut ranges: Vec<(usize, (i64, i64))> = periods
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.span().map(|r| (i, r)))
        .collect();
    ranges.sort_by_key(|(_, r)| r.0);

    for (pos, (i, a)) in ranges.iter().enumerate() {
        for (j, b) in ranges.iter().skip(pos + 1) {
            if overlaps(*a, *b) {
                return Some(Conflict {
                    changed: *j,
                    other: *i,
                });
            }
        }
    }
    None
}

/// At most one open period per type.
pub fn validate_open_slots(drafts: &[PeriodDraft]) -> AppResult<()> {
    for (j, d) in drafts.iter().enumerate() {
        if d.clock_out.is_some() {
            continue;
        }
        if let Some(i) = drafts[..j]
            .iter()
            .position(|p| p.clock_out.is_none() && p.kind == d.kind)
        {
            return Err(AppError::MultipleOpenPeriods {
                kind: d.kind.to_string(),
                first: i,
                second: j,
            });
        }
    }
    Ok(())
}

/// Full validation before a day is written: at least one period, every
/// period has a clock-in, no inverted range, one open period per type and
/// no overlap.
pub fn validate_day(drafts: &[PeriodDraft]) -> AppResult<()> {
    if drafts.is_empty() {
        return Err(AppError::EmptyDay);
    }

    for (i, d) in drafts.iter().enumerate() {
        if d.clock_in.is_none() {
            return Err(AppError::MissingClockIn(i));
        }
        validate_order(i, d)?;
    }
    validate_open_slots(drafts)?;

    match find_conflict(drafts) {
        Some(c) => {
            tracing::debug!(changed = c.changed, other = c.other, "period conflict");
            Err(c.into())
        }
        None => Ok(()),
    }
}
