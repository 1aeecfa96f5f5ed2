use crate::errors::AppResult;
use crate::export::model::PeriodRow;
use csv::{QuoteStyle, ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const BOM: &str = "\u{feff}";

/// UTF-8 BOM, header row, every field quoted.
pub(crate) fn write_csv(path: &Path, rows: &[PeriodRow]) -> AppResult<()> {
    let mut file = File::create(path)?;
    file.write_all(BOM.as_bytes())?;

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(file);

    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Rows with their 1-based line number (header is line 1). A row that
/// cannot be read is returned as the error text for that line.
pub(crate) fn read_csv(path: &Path) -> AppResult<Vec<(usize, Result<PeriodRow, String>)>> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    Ok(rdr
        .deserialize::<PeriodRow>()
        .enumerate()
        .map(|(i, r)| (i + 2, r.map_err(|e| e.to_string())))
        .collect())
}
