use super::period_type::PeriodType;
use super::serde_fmt;
use crate::errors::AppResult;
use crate::utils::time::{self, format_time_short, to_minutes, to_seconds};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// One contiguous interval of work.
///
/// `duration` is derived from the endpoints and is `None` while the period
/// is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(rename = "type")]
    pub kind: PeriodType,
    #[serde(with = "serde_fmt::time")]
    pub clock_in: NaiveTime,
    #[serde(with = "serde_fmt::time_opt", default)]
    pub clock_out: Option<NaiveTime>,
    #[serde(with = "serde_fmt::duration_opt", default)]
    pub duration: Option<Duration>,
}

impl Period {
    pub fn open(kind: PeriodType, clock_in: NaiveTime) -> Self {
        Self {
            kind,
            clock_in,
            clock_out: None,
            duration: None,
        }
    }

    /// A closed period from a manual edit. Clock-out may not precede
    /// clock-in (no overnight spans in the per-period edit model).
    pub fn closed(kind: PeriodType, clock_in: NaiveTime, clock_out: NaiveTime) -> AppResult<Self> {
        let duration = time::duration(clock_in, clock_out, false)?;
        Ok(Self {
            kind,
            clock_in,
            clock_out: Some(clock_out),
            duration: Some(duration),
        })
    }

    /// A closed period whose clock-out falls on the following day.
    pub fn closed_overnight(kind: PeriodType, clock_in: NaiveTime, clock_out: NaiveTime) -> AppResult<Self> {
        let mut period = Self::open(kind, clock_in);
        period.close_at(clock_out, true)?;
        Ok(period)
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.clock_out.is_some()
    }

    /// Set the clock-out and derive the duration.
    pub fn close_at(&mut self, clock_out: NaiveTime, allow_wrap: bool) -> AppResult<()> {
        let duration = time::duration(self.clock_in, clock_out, allow_wrap)?;
        self.clock_out = Some(clock_out);
        self.duration = Some(duration);
        Ok(())
    }

    /// Re-derive `duration` from the endpoints.
    pub fn recompute(&mut self, allow_wrap: bool) -> AppResult<()> {
        self.duration = match self.clock_out {
            Some(out) => Some(time::duration(self.clock_in, out, allow_wrap)?),
            None => None,
        };
        Ok(())
    }

    /// Clock-out earlier than clock-in: the period ends the next day.
    pub fn wraps(&self) -> bool {
        self.clock_out
            .is_some_and(|out| to_seconds(out) < to_seconds(self.clock_in))
    }

    /// Minute interval for overlap checks; `None` while open. A wrapped
    /// period ends past 1440.
    pub fn minute_range(&self) -> Option<(i64, i64)> {
        self.clock_out.map(|out| minute_span(self.clock_in, out))
    }

    /// Seconds from the start of the record's date to clock-out.
    pub fn end_offset_secs(&self) -> Option<i64> {
        self.clock_out.map(|out| {
            let secs = to_seconds(out);
            if self.wraps() { secs + 86_400 } else { secs }
        })
    }

    /// Stored duration when closed, elapsed time at `now` when open.
    pub fn live_duration(&self, now: NaiveTime) -> Duration {
        match (self.clock_out, self.duration) {
            (Some(_), Some(d)) => d,
            (Some(_), None) => Duration::zero(),
            (None, _) => time::live_duration(self.clock_in, now),
        }
    }

    pub fn span_label(&self) -> String {
        let out = self
            .clock_out
            .map(format_time_short)
            .unwrap_or_else(|| "--:--".to_string());
        format!("{}-{}", format_time_short(self.clock_in), out)
    }
}

fn minute_span(clock_in: NaiveTime, clock_out: NaiveTime) -> (i64, i64) {
    let start = to_minutes(clock_in);
    let end = to_minutes(clock_out);
    if to_seconds(clock_out) < to_seconds(clock_in) {
        (start, end + 1440)
    } else {
        (start, end)
    }
}

/// A period as edited on screen: any endpoint may still be empty.
///
/// `overnight` marks a stored period that was closed past midnight. Only
/// such a draft may keep a clock-out earlier than its clock-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDraft {
    pub kind: PeriodType,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub overnight: bool,
}

impl PeriodDraft {
    pub fn new(kind: PeriodType) -> Self {
        Self {
            kind,
            clock_in: None,
            clock_out: None,
            overnight: false,
        }
    }

    pub fn with_times(kind: PeriodType, clock_in: NaiveTime, clock_out: Option<NaiveTime>) -> Self {
        Self {
            kind,
            clock_in: Some(clock_in),
            clock_out,
            overnight: false,
        }
    }

    /// Minute interval when both endpoints are set.
    pub fn minute_range(&self) -> Option<(i64, i64)> {
        match (self.clock_in, self.clock_out) {
            (Some(i), Some(o)) => Some(minute_span(i, o)),
            _ => None,
        }
    }
}

impl From<&Period> for PeriodDraft {
    fn from(p: &Period) -> Self {
        Self {
            kind: p.kind,
            clock_in: Some(p.clock_in),
            clock_out: p.clock_out,
            overnight: p.wraps(),
        }
    }
}
