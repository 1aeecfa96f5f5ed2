use crate::cli::commands::open_ledger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ImportLogic;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let mut ledger = open_ledger(cfg)?;
        let report = ImportLogic::import(&mut ledger, &expand_tilde(file))?;

        success(format!("Imported {} new day(s).", report.added.len()));
        if !report.skipped_existing.is_empty() {
            info(format!(
                "{} day(s) already present, left unchanged.",
                report.skipped_existing.len()
            ));
        }
        for r in &report.rejected {
            warning(format!("Rejected {r}"));
        }
    }
    Ok(())
}
