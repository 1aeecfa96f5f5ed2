use crate::db::repository::Repository;
use crate::db::store::BlobStore;
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

/// What startup reconciliation did with `records_backup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupAction {
    /// `records` was empty and was restored from the backup (entry count).
    Restored(usize),
    /// The backup was refreshed from `records` (entry count).
    Refreshed(usize),
    Unchanged,
}

fn entry_count(v: &Option<Value>) -> usize {
    match v {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

pub struct BackupLogic;

impl BackupLogic {
    /// Keep `records_backup` in step with `records`, or bring `records`
    /// back from the backup when it has been emptied.
    pub fn reconcile<S: BlobStore>(repo: &mut Repository<S>) -> AppResult<BackupAction> {
        let records = repo.raw_records()?;
        let count = entry_count(&records);

        if count == 0 {
            let backup = repo.backup()?;
            let saved = entry_count(&backup);
            if let Some(backup) = backup.filter(|_| saved > 0) {
                repo.write_raw_records(&backup)?;
                repo.audit("backup", "records", &format!("restored {saved} entries"));
                tracing::info!(entries = saved, "records restored from backup");
                return Ok(BackupAction::Restored(saved));
            }
            return Ok(BackupAction::Unchanged);
        }

        let Some(records) = records else {
            return Ok(BackupAction::Unchanged);
        };
        if repo.backup()?.as_ref() == Some(&records) {
            return Ok(BackupAction::Unchanged);
        }
        repo.set_backup(&records)?;
        tracing::debug!(entries = count, "records backup refreshed");
        Ok(BackupAction::Refreshed(count))
    }

    /// Copy the database file to `dest`, optionally replacing it with a
    /// zip archive. Returns the path actually written.
    pub fn backup_file(db_path: &Path, dest: &Path, compress: bool) -> AppResult<PathBuf> {
        if !db_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", db_path.display()),
            )
            .into());
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::copy(db_path, dest)?;

        if !compress {
            return Ok(dest.to_path_buf());
        }

        let compressed = compress_backup(dest)?;
        if compressed != dest
            && let Err(e) = fs::remove_file(dest)
        {
            tracing::warn!(path = %dest.display(), error = %e, "failed to remove uncompressed backup");
        }
        Ok(compressed)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Other(format!("invalid backup path: {}", path.display())))?;

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(name, options).map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}
