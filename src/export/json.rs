use crate::errors::AppResult;
use crate::models::day_record::DayRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Day records in their stored shape, pretty-printed.
pub(crate) fn write_json(path: &Path, days: &[DayRecord]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(days)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
