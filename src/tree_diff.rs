//! Recursive comparison of a source directory against its installed copy.
//!
//! [`diff`] only inspects; [`sync`] and [`sync_entry`] also realize the
//! result. Entries whose base name is the layout's protected name
//! (`wallpaper` by default) are invisible at every depth: they are never
//! reported, copied, overwritten or removed, including when an enclosing
//! directory is removed or replaced.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Layout;
use crate::error::{ModError, Result};
use crate::operations;

/// Relative paths that differ between a source tree and a destination tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeDiff {
    /// Present in the source only; must be copied to the destination.
    pub only_in_source: BTreeSet<PathBuf>,
    /// Present in the destination only; must be removed from it.
    pub only_in_destination: BTreeSet<PathBuf>,
    /// Present in both with different content or kind.
    pub differing: BTreeSet<PathBuf>,
}

impl TreeDiff {
    /// Whether the two trees differ at all.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.only_in_source.is_empty()
            || !self.only_in_destination.is_empty()
            || !self.differing.is_empty()
    }
}

/// Compare `source` against `dest` without modifying anything.
///
/// A missing `dest` makes every source entry `only_in_source`.
///
/// # Errors
///
/// Returns [`ModError::Io`] if a directory cannot be listed or a file cannot
/// be read.
pub fn diff(source: &Path, dest: &Path, layout: &Layout) -> Result<TreeDiff> {
    let mut out = TreeDiff::default();
    diff_into(source, dest, Path::new(""), layout, &mut out)?;
    Ok(out)
}

fn diff_into(
    source: &Path,
    dest: &Path,
    rel: &Path,
    layout: &Layout,
    out: &mut TreeDiff,
) -> Result<()> {
    let src_names = entry_names(source, layout)?;
    let dst_names = if dest.is_dir() {
        entry_names(dest, layout)?
    } else {
        BTreeSet::new()
    };

    for name in src_names.difference(&dst_names) {
        out.only_in_source.insert(rel.join(name));
    }
    for name in dst_names.difference(&src_names) {
        out.only_in_destination.insert(rel.join(name));
    }
    for name in src_names.intersection(&dst_names) {
        let src = source.join(name);
        let dst = dest.join(name);
        let rel = rel.join(name);
        match (src.is_dir(), dst.is_dir()) {
            (true, true) => diff_into(&src, &dst, &rel, layout, out)?,
            (false, false) => {
                if !operations::files_equal(&src, &dst)? {
                    out.differing.insert(rel);
                }
            }
            _ => {
                out.differing.insert(rel);
            }
        }
    }
    Ok(())
}

/// Names of the entries directly inside `dir`, minus the protected name.
fn entry_names(dir: &Path, layout: &Layout) -> Result<BTreeSet<OsString>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(ModError::io("read directory", dir))? {
        let name = entry.map_err(ModError::io("read directory", dir))?.file_name();
        if !layout.is_protected(&name.to_string_lossy()) {
            names.insert(name);
        }
    }
    Ok(names)
}

/// Bring `dest` in line with `source` and return what was different.
///
/// # Errors
///
/// Returns [`ModError::Io`] on the first failing comparison, copy or removal.
/// Operations already performed are not rolled back.
pub fn sync(source: &Path, dest: &Path, layout: &Layout) -> Result<TreeDiff> {
    let result = diff(source, dest, layout)?;
    if !result.changed() {
        return Ok(result);
    }

    fs::create_dir_all(dest).map_err(ModError::io("create directory", dest))?;
    for rel in result.only_in_source.iter().chain(&result.differing) {
        tracing::debug!("copy {}", rel.display());
        replace_unprotected(&source.join(rel), &dest.join(rel), layout)?;
    }
    for rel in &result.only_in_destination {
        tracing::debug!("remove {}", rel.display());
        remove_unprotected(&dest.join(rel), layout)?;
    }
    Ok(result)
}

/// Remove `path` like [`operations::remove_entry`], but keep every protected
/// descendant together with the directories leading to it.
///
/// Returns whether `path` is gone afterwards.
///
/// # Errors
///
/// Returns [`ModError::Io`] if an entry cannot be listed or removed.
pub fn remove_unprotected(path: &Path, layout: &Layout) -> Result<bool> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(true);
    };
    if !meta.is_dir() {
        operations::remove_entry(path)?;
        return Ok(true);
    }

    let mut emptied = true;
    for entry in fs::read_dir(path).map_err(ModError::io("read directory", path))? {
        let entry = entry.map_err(ModError::io("read directory", path))?;
        if layout.is_protected(&entry.file_name().to_string_lossy()) {
            tracing::debug!("keep {}", entry.path().display());
            emptied = false;
        } else if !remove_unprotected(&entry.path(), layout)? {
            emptied = false;
        }
    }
    if emptied {
        fs::remove_dir(path).map_err(ModError::io("remove", path))?;
    }
    Ok(emptied)
}

/// Make `dest` a copy of `source` unless that would delete a protected
/// descendant of an existing `dest` directory. Such a directory is emptied
/// around the protected entries and left in place with a warning.
fn replace_unprotected(source: &Path, dest: &Path, layout: &Layout) -> Result<()> {
    let dest_is_dir = fs::symlink_metadata(dest).is_ok_and(|m| m.is_dir());
    if dest_is_dir && !source.is_dir() && !remove_unprotected(dest, layout)? {
        tracing::warn!(
            "{} holds protected entries and was not replaced",
            dest.display()
        );
        return Ok(());
    }
    operations::replace_entry(source, dest)
}

/// Bring the single entry `dest` in line with `source`, which may be a file
/// or a directory. Returns whether anything was changed.
///
/// A protected entry is left alone and reported unchanged; a missing `dest`
/// is restored from `source`.
///
/// # Errors
///
/// Returns [`ModError::Io`] if comparing or copying fails.
pub fn sync_entry(source: &Path, dest: &Path, layout: &Layout) -> Result<bool> {
    let protected = source
        .file_name()
        .is_some_and(|name| layout.is_protected(&name.to_string_lossy()));
    if protected {
        return Ok(false);
    }

    if dest.symlink_metadata().is_err() {
        operations::replace_entry(source, dest)?;
        return Ok(true);
    }

    match (source.is_dir(), dest.is_dir()) {
        (true, true) => Ok(sync(source, dest, layout)?.changed()),
        (false, false) => {
            if operations::files_equal(source, dest)? {
                Ok(false)
            } else {
                operations::replace_entry(source, dest)?;
                Ok(true)
            }
        }
        _ => {
            replace_unprotected(source, dest, layout)?;
            Ok(true)
        }
    }
}
