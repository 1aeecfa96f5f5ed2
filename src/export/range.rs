// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::{DateRange, month_last_day, parse_date};
use chrono::NaiveDate;

/// Parse a `--range` / `--period` expression.
///
/// Supported:
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
/// - `YYYY:YYYY`, `YYYY-MM:YYYY-MM`, `YYYY-MM-DD:YYYY-MM-DD`
/// - `all` (no filter, returns `None`)
///
/// `/` is accepted in place of `-`.
pub fn parse_range(r: &str) -> AppResult<Option<DateRange>> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let invalid = || AppError::InvalidDate(r.to_string());

    if let Some((start, end)) = r.split_once(':') {
        let (start, end) = (start.trim(), end.trim());
        if start.len() != end.len() {
            return Err(AppError::InvalidDate(format!(
                "{r}: start and end must have the same format"
            )));
        }
        let (first, _) = bounds(start).ok_or_else(invalid)?;
        let (_, last) = bounds(end).ok_or_else(invalid)?;
        return Ok(Some(DateRange::new(first, last)));
    }

    let (first, last) = bounds(r).ok_or_else(invalid)?;
    Ok(Some(DateRange::new(first, last)))
}

/// First and last day covered by a year, month or day.
fn bounds(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let s = s.replace('/', "-");
    match s.len() {
        4 => {
            let y: i32 = s.parse().ok()?;
            Some((
                NaiveDate::from_ymd_opt(y, 1, 1)?,
                NaiveDate::from_ymd_opt(y, 12, 31)?,
            ))
        }
        7 => {
            let (y, m) = s.split_once('-')?;
            let y: i32 = y.parse().ok()?;
            let m: u32 = m.parse().ok()?;
            let last = month_last_day(y, m)?;
            Some((
                NaiveDate::from_ymd_opt(y, m, 1)?,
                NaiveDate::from_ymd_opt(y, m, last)?,
            ))
        }
        10 => {
            let d = parse_date(&s)?;
            Some((d, d))
        }
        _ => None,
    }
}
