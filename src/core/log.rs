use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ansi regex"));

const OP_WIDTH_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Colour of an operation name in the log listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "del" => Colour::Red,
        "edit" | "save" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "import" | "export" => Colour::RGB(102, 178, 255),
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

/// Shorten to `OP_WIDTH_MAX` visible chars, colouring only the operation.
fn render_op(e: &LogEntry) -> String {
    let plain = op_target(e);
    let visible = if plain.chars().count() > OP_WIDTH_MAX {
        let mut s: String = plain.chars().take(OP_WIDTH_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&e.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let dates: Vec<String> = entries
            .iter()
            .map(|e| {
                chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone())
            })
            .collect();

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = dates.iter().map(|d| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (e, date) in entries.iter().zip(dates.iter()) {
            let op = render_op(e);
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).chars().count()));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                date,
                op,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
