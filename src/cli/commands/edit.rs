use crate::cli::commands::{open_ledger, period_index, print_day};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::PeriodPatch;
use crate::errors::{AppError, AppResult};
use crate::models::period_type::PeriodType;
use crate::ui::messages::{info, success};
use crate::utils::date::parse_date_arg;
use crate::utils::time::normalize_to_seconds;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        date,
        period,
        kind,
        clock_in,
        clock_out,
        clear_out,
    } = cmd
    {
        let date = parse_date_arg(date)?;
        let index = period_index(*period)?;

        let patch = PeriodPatch {
            kind: kind
                .as_deref()
                .map(|k| PeriodType::pt_from_str(k).ok_or_else(|| AppError::InvalidPeriodType(k.into())))
                .transpose()?,
            clock_in: clock_in.as_deref().map(normalize_to_seconds).transpose()?,
            clock_out: if *clear_out {
                Some(None)
            } else {
                clock_out
                    .as_deref()
                    .map(normalize_to_seconds)
                    .transpose()?
                    .map(Some)
            },
        };

        if patch.is_empty() {
            info("Nothing to change.");
            return Ok(());
        }

        let mut ledger = open_ledger(cfg)?;
        ledger.upsert_period_fields(date, index, &patch)?;
        success(format!("Period #{} updated.", period));

        if let Some(day) = ledger.get_day(date) {
            print_day(&day, cfg, None);
        }
    }
    Ok(())
}
