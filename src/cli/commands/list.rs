use crate::cli::commands::{open_ledger, print_day};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::ui::messages::{header, info};
use crate::utils::date::DateRange;
use chrono::Datelike;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period } = cmd {
        let ledger = open_ledger(cfg)?;
        let today = ledger.today();

        let range = match period {
            Some(p) => parse_range(p)?,
            None => Some(DateRange::month(today.year(), today.month(), today)?),
        };

        let days = match &range {
            Some(r) => ledger.days_in(r),
            None => ledger.all_days(),
        };

        if days.is_empty() {
            info("No records found for the selected period.");
            return Ok(());
        }

        match &range {
            Some(r) => header(format!("{} → {}", r.start, r.end)),
            None => header("All records"),
        }

        let now = ledger.now();
        for day in &days {
            let live = (day.date == now.date()).then(|| now.time());
            print_day(day, cfg, live);
            println!();
        }
    }
    Ok(())
}
