use crate::cli::commands::{open_ledger, print_day, resolve_date};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::live_status;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::format_date;
use crate::utils::formatting::duration_label;
use std::thread;
use std::time::Duration as StdDuration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { date, watch } = cmd {
        let ledger = open_ledger(cfg)?;
        let date = resolve_date(date, ledger.today())?;

        loop {
            let now = ledger.now();
            let day = ledger.get_day(date);
            if *watch {
                // clear screen, cursor home
                print!("\x1b[2J\x1b[H");
            }

            match &day {
                Some(d) => print_day(d, cfg, Some(now.time())),
                None => info(format!("No periods recorded for {}", format_date(date))),
            }

            let status = live_status(date, day.as_ref(), now);
            println!(
                "\nMain: {}  Overtime: {}  Total: {}",
                duration_label(status.main),
                duration_label(status.overtime),
                duration_label(status.total())
            );
            if !status.open.is_empty() {
                println!("In progress: {} period(s)", status.open.len());
            }

            if !*watch {
                break;
            }
            thread::sleep(StdDuration::from_secs(1));
        }
    }
    Ok(())
}
