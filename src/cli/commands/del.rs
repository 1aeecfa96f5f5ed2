use crate::cli::commands::{ask_confirmation, open_ledger, period_index};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::date::{format_date, parse_date_arg};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        date: date_str,
        period,
        yes,
    } = cmd
    {
        let d = parse_date_arg(date_str)?;
        let label = format_date(d);

        let prompt = match period {
            Some(p) => format!("Delete period #{} for {}? This action is irreversible.", p, label),
            None => format!("Delete ALL periods for {}? This action is irreversible.", label),
        };

        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut ledger = open_ledger(cfg)?;

        match period {
            Some(p) => {
                ledger.delete_period(d, period_index(*p)?)?;
                success(format!("Period #{} for {} has been deleted.", p, label));
            }
            None => {
                ledger.delete_day(d)?;
                success(format!("All periods for {} have been deleted.", label));
            }
        }
    }

    Ok(())
}
