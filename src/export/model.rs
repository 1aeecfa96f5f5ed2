// src/export/model.rs

use crate::models::day_record::DayRecord;
use crate::utils::time::{format_hms, format_time};
use serde::{Deserialize, Serialize};

/// One period as a flat export row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PeriodRow {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub clock_in: String,
    #[serde(default)]
    pub clock_out: String,
    #[serde(default)]
    pub duration: String,
}

pub(crate) fn rows_from_days(days: &[DayRecord]) -> Vec<PeriodRow> {
    days.iter()
        .flat_map(|day| {
            let date = day.date_str();
            day.periods().iter().map(move |p| PeriodRow {
                date: date.clone(),
                kind: p.kind.as_str().to_string(),
                clock_in: format_time(p.clock_in),
                clock_out: p.clock_out.map(format_time).unwrap_or_default(),
                duration: p.duration.map(format_hms).unwrap_or_default(),
            })
        })
        .collect()
}
