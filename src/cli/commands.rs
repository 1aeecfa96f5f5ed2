pub mod backup;
pub mod clock;
pub mod config;
pub mod del;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod migrate;
pub mod save;
pub mod stats;
pub mod status;

use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::period_type::PeriodType;
use crate::ui::messages::warning;
use crate::utils::colors::{RESET, color_for_period_type, colorize_in_out, colorize_optional};
use crate::utils::date::parse_date_arg;
use crate::utils::formatting::{bold, clock_label, duration_label};
use chrono::{NaiveDate, NaiveTime};
use std::io::{self, Write};

pub(crate) fn open_ledger(cfg: &Config) -> AppResult<Ledger<DbPool>> {
    Ok(Ledger::with_system_clock(DbPool::new(&cfg.database)?))
}

pub(crate) fn resolve_date(arg: &Option<String>, today: NaiveDate) -> AppResult<NaiveDate> {
    match arg {
        Some(s) => parse_date_arg(s),
        None => Ok(today),
    }
}

pub(crate) fn resolve_kind(arg: &Option<String>, cfg: &Config) -> AppResult<PeriodType> {
    match arg {
        Some(s) => PeriodType::pt_from_str(s).ok_or_else(|| AppError::InvalidPeriodType(s.clone())),
        None => Ok(cfg.default_period_type),
    }
}

/// 1-based period number from the command line to a list index.
pub(crate) fn period_index(n: usize) -> AppResult<usize> {
    n.checked_sub(1).ok_or(AppError::InvalidPeriodIndex(n))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// One line per period. With `now`, open periods show their running
/// duration.
pub(crate) fn print_day(day: &DayRecord, cfg: &Config, now: Option<NaiveTime>) {
    println!("{}", bold(&day.date_str()));
    for (i, p) in day.periods().iter().enumerate() {
        let color = color_for_period_type(p.kind.is_overtime());
        let dur = match (p.duration, now) {
            (Some(d), _) => duration_label(d),
            (None, Some(at)) => format!("{} (running)", duration_label(p.live_duration(at))),
            (None, None) => "--:--".to_string(),
        };
        println!(
            "  #{:<2} {color}{:<8}{RESET} {} -> {}  {}",
            i + 1,
            p.kind.label(),
            colorize_in_out(&clock_label(Some(p.clock_in), cfg.show_seconds), true),
            colorize_in_out(&clock_label(p.clock_out, cfg.show_seconds), false),
            colorize_optional(&dur),
        );
    }
    let total = day.total_work_time().map(duration_label).unwrap_or_else(|| "--:--".into());
    println!("  Total: {}", colorize_optional(&total));
}
