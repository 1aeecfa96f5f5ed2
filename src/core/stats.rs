//! Aggregates over a date range of day records.
//!
//! Only closed periods count towards the range statistics. Open periods
//! are reported separately and show up in the live totals of a single day.

use crate::models::day_record::DayRecord;
use crate::models::period::Period;
use crate::models::period_type::PeriodType;
use crate::utils::date::DateRange;
use crate::utils::time::{duration_hours, hours_of_day};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStats {
    pub range: DateRange,
    /// Days in the range with at least one closed main period.
    pub valid_days: usize,
    pub avg_main: Option<Duration>,
    pub total_main: Duration,
    pub overtime_days: usize,
    pub avg_overtime: Option<Duration>,
    pub total_overtime: Duration,
    pub total_work: Duration,
    pub earliest_clock_in: Option<NaiveTime>,
    pub latest_clock_out: Option<NaiveTime>,
    /// In-progress periods left out of the figures above.
    pub open_periods: usize,
}

fn average(total: Duration, n: usize) -> Option<Duration> {
    if n == 0 {
        return None;
    }
    Some(Duration::seconds(total.num_seconds() / n as i64))
}

fn closed_total(day: &DayRecord, kind: PeriodType) -> Option<Duration> {
    day.complete_periods()
        .filter(|p| p.kind == kind)
        .filter_map(|p| p.duration)
        .reduce(|a, b| a + b)
}

pub fn compute_stats<'a>(
    days: impl IntoIterator<Item = &'a DayRecord>,
    range: DateRange,
) -> RangeStats {
    let mut stats = RangeStats {
        range,
        valid_days: 0,
        avg_main: None,
        total_main: Duration::zero(),
        overtime_days: 0,
        avg_overtime: None,
        total_overtime: Duration::zero(),
        total_work: Duration::zero(),
        earliest_clock_in: None,
        latest_clock_out: None,
        open_periods: 0,
    };

    // Overnight clock-outs rank after midnight.
    let mut latest_offset: Option<i64> = None;

    for day in days.into_iter().filter(|d| range.contains(d.date)) {
        stats.open_periods += day.periods().iter().filter(|p| p.is_open()).count();

        if let Some(main) = closed_total(day, PeriodType::Main) {
            stats.valid_days += 1;
            stats.total_main = stats.total_main + main;
        }
        if let Some(ot) = closed_total(day, PeriodType::Overtime) {
            stats.overtime_days += 1;
            stats.total_overtime = stats.total_overtime + ot;
        }

        for p in day.complete_periods() {
            stats.earliest_clock_in = Some(match stats.earliest_clock_in {
                Some(t) => t.min(p.clock_in),
                None => p.clock_in,
            });
            if let (Some(out), Some(offset)) = (p.clock_out, p.end_offset_secs())
                && latest_offset.is_none_or(|l| offset > l)
            {
                latest_offset = Some(offset);
                stats.latest_clock_out = Some(out);
            }
        }
    }

    stats.total_work = stats.total_main + stats.total_overtime;
    stats.avg_main = average(stats.total_main, stats.valid_days);
    stats.avg_overtime = average(stats.total_overtime, stats.overtime_days);
    stats
}

/// One slot of the daily chart series. All fields are `None` on days
/// without data, so gaps stay visible.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub first_in: Option<f64>,
    pub last_out: Option<f64>,
    pub main_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
}

impl DayPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            first_in: None,
            last_out: None,
            main_hours: None,
            overtime_hours: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_in.is_none() && self.last_out.is_none()
    }
}

pub fn daily_series(days: &[DayRecord], range: DateRange) -> Vec<DayPoint> {
    range
        .days()
        .into_iter()
        .map(|date| {
            let Some(day) = days.iter().find(|d| d.date == date) else {
                return DayPoint::empty(date);
            };
            DayPoint {
                date,
                first_in: day.periods().iter().map(|p| p.clock_in).min().map(hours_of_day),
                last_out: day
                    .complete_periods()
                    .filter_map(Period::end_offset_secs)
                    .max()
                    .map(|secs| secs as f64 / 3600.0),
                main_hours: closed_total(day, PeriodType::Main).map(duration_hours),
                overtime_hours: closed_total(day, PeriodType::Overtime).map(duration_hours),
            }
        })
        .collect()
}

/// Running figures for one day at `now`, open periods included.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStatus {
    pub date: NaiveDate,
    pub now: NaiveDateTime,
    pub main: Duration,
    pub overtime: Duration,
    pub open: Vec<(usize, Period, Duration)>,
}

impl LiveStatus {
    pub fn total(&self) -> Duration {
        self.main + self.overtime
    }
}

pub fn live_status(date: NaiveDate, day: Option<&DayRecord>, now: NaiveDateTime) -> LiveStatus {
    let at = now.time();
    let (main, overtime) = day
        .map(|d| d.live_totals_by_type(at))
        .unwrap_or((Duration::zero(), Duration::zero()));
    let open = day
        .map(|d| {
            d.periods()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_open())
                .map(|(i, p)| (i, p.clone(), p.live_duration(at)))
                .collect()
        })
        .unwrap_or_default();

    LiveStatus {
        date,
        now,
        main,
        overtime,
        open,
    }
}
