use crate::cli::commands::open_ledger;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let mut ledger = open_ledger(cfg)?;
        let path = expand_tilde(file);
        ExportLogic::export(&mut ledger, *format, &path, range.as_deref(), *force)?;
    }
    Ok(())
}
