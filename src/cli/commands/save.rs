use crate::cli::commands::{open_ledger, print_day};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::period::PeriodDraft;
use crate::models::period_type::PeriodType;
use crate::ui::messages::success;
use crate::utils::date::parse_date_arg;
use crate::utils::time::normalize_to_seconds;
use chrono::NaiveTime;

/// `TYPE,IN[,OUT]`; an empty IN is kept so the day validation reports it.
fn parse_period_arg(arg: &str) -> AppResult<PeriodDraft> {
    let mut parts = arg.split(',').map(str::trim);
    let kind_raw = parts.next().unwrap_or_default();
    let kind = PeriodType::pt_from_str(kind_raw)
        .ok_or_else(|| AppError::InvalidPeriodType(kind_raw.to_string()))?;

    let clock_in = optional_time(parts.next())?;
    let clock_out = optional_time(parts.next())?;

    Ok(PeriodDraft {
        kind,
        clock_in,
        clock_out,
        overnight: false,
    })
}

fn optional_time(p: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match p {
        Some(s) if !s.is_empty() => normalize_to_seconds(s).map(Some),
        _ => Ok(None),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Save { date, periods } = cmd {
        let date = parse_date_arg(date)?;
        let drafts = periods
            .iter()
            .map(|s| parse_period_arg(s))
            .collect::<AppResult<Vec<_>>>()?;

        let mut ledger = open_ledger(cfg)?;
        let day = ledger.save(date, &drafts)?;

        success(format!("Saved {} period(s) for {}.", day.len(), day.date_str()));
        print_day(&day, cfg, None);
    }
    Ok(())
}
