//! Time utilities: parsing HH:MM[:SS], minute/second offsets, duration
//! arithmetic with optional midnight wraparound, HH:MM:SS formatting.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

pub const SECONDS_PER_DAY: i64 = 24 * 3600;

static TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("static time regex")
});

/// Minutes since midnight, seconds ignored. Used for conflict comparison.
pub fn to_minutes(t: NaiveTime) -> i64 {
    (t.hour() * 60 + t.minute()) as i64
}

/// Seconds since midnight.
pub fn to_seconds(t: NaiveTime) -> i64 {
    t.num_seconds_from_midnight() as i64
}

/// `end - start`.
///
/// A negative difference is wrapped by adding 24h when `allow_wrap` is set
/// (overnight clock-in/out pairs); otherwise it is an `InvalidRange`.
pub fn duration(start: NaiveTime, end: NaiveTime, allow_wrap: bool) -> AppResult<Duration> {
    let mut secs = to_seconds(end) - to_seconds(start);
    if secs < 0 {
        if !allow_wrap {
            return Err(AppError::InvalidRange {
                index: 0,
                clock_in: format_time(start),
                clock_out: format_time(end),
            });
        }
        secs += SECONDS_PER_DAY;
    }
    Ok(Duration::seconds(secs))
}

/// Accept `HH:MM` or `HH:MM:SS` (single-digit hour tolerated) and return the
/// time with second resolution. `HH:MM` gets `:00` appended.
pub fn normalize_to_seconds(t: &str) -> AppResult<NaiveTime> {
    let raw = t.trim();
    let caps = TIME_SHAPE
        .captures(raw)
        .ok_or_else(|| AppError::MalformedTime(t.to_string()))?;

    let field = |i: usize| -> AppResult<u32> {
        caps.get(i)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>())
            .map_err(|_| AppError::MalformedTime(t.to_string()))
    };

    NaiveTime::from_hms_opt(field(1)?, field(2)?, field(3)?)
        .ok_or_else(|| AppError::MalformedTime(t.to_string()))
}

/// Same as `normalize_to_seconds` but returns the canonical `HH:MM:SS` text.
pub fn normalize_time_str(t: &str) -> AppResult<String> {
    normalize_to_seconds(t).map(format_time)
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

pub fn format_time_short(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// `HH:MM:SS`; hours are not capped at 24 so day totals stay readable.
pub fn format_hms(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Parse a stored `H+:MM:SS` duration.
pub fn parse_hms_duration(s: &str) -> AppResult<Duration> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(AppError::MalformedTime(s.to_string()));
    }
    let nums = parts
        .iter()
        .map(|p| p.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::MalformedTime(s.to_string()))?;

    if nums.iter().any(|n| *n < 0) || nums[1] > 59 || nums[2] > 59 {
        return Err(AppError::MalformedTime(s.to_string()));
    }
    Ok(Duration::seconds(nums[0] * 3600 + nums[1] * 60 + nums[2]))
}

/// Elapsed time of an open period at `now`; zero if the clock-in lies in
/// the future.
pub fn live_duration(clock_in: NaiveTime, now: NaiveTime) -> Duration {
    let secs = to_seconds(now) - to_seconds(clock_in);
    Duration::seconds(secs.max(0))
}

/// Fractional hours of the day, used by chart series.
pub fn hours_of_day(t: NaiveTime) -> f64 {
    to_seconds(t) as f64 / 3600.0
}

pub fn duration_hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}
