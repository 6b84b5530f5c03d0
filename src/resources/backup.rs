//! Backup-by-rename of a pre-existing destination before a fresh install.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ModError, Result};

/// Rename `dest_root` aside to `<dest_root>.<unix seconds>.bak` if it exists.
///
/// Returns the backup location, or `None` when there was nothing to move.
/// Restoring a backup is a manual rename.
///
/// # Errors
///
/// Returns [`ModError::Io`] if the rename fails.
pub fn backup_existing(dest_root: &Path) -> Result<Option<PathBuf>> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    backup_existing_at(dest_root, stamp)
}

fn backup_existing_at(dest_root: &Path, stamp: u64) -> Result<Option<PathBuf>> {
    if dest_root.symlink_metadata().is_err() {
        return Ok(None);
    }
    let backup = free_backup_path(dest_root, stamp);
    fs::rename(dest_root, &backup).map_err(ModError::io("rename", dest_root))?;
    tracing::debug!("moved {} to {}", dest_root.display(), backup.display());
    Ok(Some(backup))
}

/// First unused backup name for `stamp`; a second backup within the same
/// second gets a `-1`, `-2`, ... suffix instead of overwriting the first.
fn free_backup_path(dest_root: &Path, stamp: u64) -> PathBuf {
    let mut attempt = 0u32;
    loop {
        let candidate = backup_path(dest_root, stamp, attempt);
        if candidate.symlink_metadata().is_err() {
            return candidate;
        }
        attempt += 1;
    }
}

fn backup_path(dest_root: &Path, stamp: u64, attempt: u32) -> PathBuf {
    let mut name = OsString::from(dest_root.as_os_str());
    if attempt == 0 {
        name.push(format!(".{stamp}.bak"));
    } else {
        name.push(format!(".{stamp}-{attempt}.bak"));
    }
    PathBuf::from(name)
}
