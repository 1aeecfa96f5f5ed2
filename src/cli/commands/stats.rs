use crate::cli::commands::open_ledger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::{compute_stats, daily_series};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::date::{DateRange, parse_month};
use crate::utils::formatting::{clock_label, duration_label, hours_label};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { month, days } = cmd {
        let ledger = open_ledger(cfg)?;
        let today = ledger.today();

        let range = match month {
            Some(m) => {
                let (y, mo) = parse_month(m)?;
                DateRange::month(y, mo, today)?
            }
            None => DateRange::recent(today, days.unwrap_or(cfg.stats_window_days)),
        };

        let records = ledger.days_in(&range);
        let stats = compute_stats(&records, range);

        header(format!("Statistics {} → {}", range.start, range.end));
        let opt = |d: Option<chrono::Duration>| d.map(duration_label).unwrap_or_else(|| "--".into());
        println!("Days worked       : {}", stats.valid_days);
        println!("Average main      : {}", opt(stats.avg_main));
        println!("Total main        : {}", duration_label(stats.total_main));
        println!("Overtime days     : {}", stats.overtime_days);
        println!("Average overtime  : {}", opt(stats.avg_overtime));
        println!("Total overtime    : {}", duration_label(stats.total_overtime));
        println!("Total work        : {}", duration_label(stats.total_work));
        println!("Earliest clock-in : {}", clock_label(stats.earliest_clock_in, cfg.show_seconds));
        println!("Latest clock-out  : {}", clock_label(stats.latest_clock_out, cfg.show_seconds));
        if stats.open_periods > 0 {
            println!("In progress       : {} (not counted)", stats.open_periods);
        }

        let mut table = Table::new(vec![
            Column::new("Date"),
            Column::new("First in"),
            Column::new("Last out"),
            Column::new("Main"),
            Column::new("Overtime"),
        ]);
        for p in daily_series(&records, range) {
            table.add_row(vec![
                p.date.format("%m-%d").to_string(),
                hours_label(p.first_in),
                hours_label(p.last_out),
                hours_label(p.main_hours),
                hours_label(p.overtime_hours),
            ]);
        }
        println!("\n{}", table.render());
    }
    Ok(())
}
