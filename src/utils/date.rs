use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};

/// Canonical on-disk date format.
pub const DATE_FMT: &str = "%Y/%m/%d";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// Normalize a stored date string: `-` or `/` separators, exactly three
/// components, month and day zero-padded. `"2024-1-5"` → `"2024/01/05"`.
///
/// Returns `None` when the string does not have three components; the
/// value is then left untouched by callers.
pub fn normalize_date(s: &str) -> Option<String> {
    let replaced = s.trim().replace('-', "/");
    let parts: Vec<&str> = replaced.split('/').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(format!("{}/{:0>2}/{:0>2}", parts[0], parts[1], parts[2]))
}

/// Parse any accepted date shape into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let normalized = normalize_date(s)?;
    NaiveDate::parse_from_str(&normalized, DATE_FMT).ok()
}

pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// `YYYY-MM` or `YYYY/MM`.
pub fn parse_month(s: &str) -> AppResult<(i32, u32)> {
    let replaced = s.trim().replace('/', "-");
    let (y, m) = replaced
        .split_once('-')
        .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
    let year = y
        .parse::<i32>()
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;
    let month = m
        .parse::<u32>()
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidDate(s.to_string()));
    }
    Ok((year, month))
}

pub fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(d: NaiveDate) -> Self {
        Self { start: d, end: d }
    }

    /// The last `days` days, today included.
    pub fn recent(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: today - Duration::days(span),
            end: today,
        }
    }

    /// A calendar month. The current month stops at `today`.
    pub fn month(year: i32, month: u32, today: NaiveDate) -> AppResult<Self> {
        let label = format!("{year}-{month:02}");
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::InvalidDate(label.clone()))?;
        let last_day = month_last_day(year, month).ok_or_else(|| AppError::InvalidDate(label.clone()))?;
        let last =
            NaiveDate::from_ymd_opt(year, month, last_day).ok_or_else(|| AppError::InvalidDate(label))?;

        let end = if today.year() == year && today.month() == month {
            today
        } else {
            last
        };
        Ok(Self::new(first, end))
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d <= self.end
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}
