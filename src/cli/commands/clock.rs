use crate::cli::commands::{open_ledger, resolve_date, resolve_kind};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::ClockOutcome;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::format_date;
use crate::utils::formatting::{clock_label, duration_label};

/// `clock` toggles the slot; `close` only closes.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Clock { kind, date } => {
            let mut ledger = open_ledger(cfg)?;
            let kind = resolve_kind(kind, cfg)?;
            let date = resolve_date(date, ledger.today())?;

            match ledger.open_period(date, kind)? {
                ClockOutcome::Opened { index, period } => success(format!(
                    "{} period #{} started at {} on {}",
                    kind.label(),
                    index + 1,
                    clock_label(Some(period.clock_in), cfg.show_seconds),
                    format_date(date)
                )),
                ClockOutcome::Closed { index, period } => success(format!(
                    "{} period #{} closed at {} ({})",
                    kind.label(),
                    index + 1,
                    clock_label(period.clock_out, cfg.show_seconds),
                    period.duration.map(duration_label).unwrap_or_default()
                )),
            }
        }
        Commands::Close { kind, date } => {
            let mut ledger = open_ledger(cfg)?;
            let kind = resolve_kind(kind, cfg)?;
            let date = resolve_date(date, ledger.today())?;

            let (index, period) = ledger.close_period(date, kind)?;
            success(format!(
                "{} period #{} closed at {} ({})",
                kind.label(),
                index + 1,
                clock_label(period.clock_out, cfg.show_seconds),
                period.duration.map(duration_label).unwrap_or_default()
            ));
        }
        _ => {}
    }
    Ok(())
}
