//! Formatting utilities used for CLI outputs.

use crate::utils::time::{format_time, format_time_short};
use chrono::{Duration, NaiveTime};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// `"00h 00m"` style; zero renders as `"0 min"`, under an hour as `"NN min"`.
pub fn duration_label(d: Duration) -> String {
    let mins = d.num_minutes();
    if mins == 0 {
        "0 min".to_string()
    } else if mins.abs() < 60 {
        format!("{mins} min")
    } else {
        mins2readable(mins, false, false)
    }
}

/// Clock time for display, `--:--` when missing.
pub fn clock_label(t: Option<NaiveTime>, show_seconds: bool) -> String {
    match t {
        Some(t) if show_seconds => format_time(t),
        Some(t) => format_time_short(t),
        None => "--:--".to_string(),
    }
}

/// Fractional hours as `HH:MM` (chart series output).
pub fn hours_label(h: Option<f64>) -> String {
    match h {
        Some(h) => mins2readable((h * 60.0).round() as i64, false, true),
        None => "--:--".to_string(),
    }
}
