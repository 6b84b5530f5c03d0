//! Bring every installed entry up to date with the source tree.
use std::path::Path;

use super::{Change, Reconciler, Report};
use crate::error::{ModError, Result};
use crate::record::{ESSENTIAL, Record};
use crate::tree_diff;

impl Reconciler {
    /// Refresh the essential set and every recorded mod from the source tree.
    ///
    /// For each recorded entry the current stylesheet list is recomputed from
    /// its source directory: new names are copied in, vanished names are
    /// removed, and names present on both sides are synchronized recursively.
    /// A mod whose source directory no longer exists is reported as
    /// [`Change::SourceMissing`] and left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::NotInstalled`] if the essential set was never
    /// installed, [`ModError::MissingSourceEntry`] if the essential source is
    /// incomplete, or [`ModError::Io`] if a file operation fails. The record is
    /// left unchanged on error.
    pub fn refresh(&mut self) -> Result<Report> {
        self.require_installed()?;
        let mut record = self.record.clone();
        let mut report = Report::default();

        let old = record.essential().map(<[String]>::to_vec).unwrap_or_default();
        let new = self.catalog.essential_entries()?;
        let changed = self.refresh_entries(self.catalog.root(), &old, &new)?;
        record.set_essential(new);
        report.push(ESSENTIAL, updated_or_unchanged(changed), None);

        for category in record.categories() {
            for (name, old) in installed_mods(&record, &category) {
                let mod_dir = self.catalog.mod_dir(&category, &name);
                let new = match self.catalog.stylesheet_entries(&mod_dir) {
                    Ok(new) => new,
                    Err(ModError::MissingSourceEntry { path }) => {
                        tracing::warn!("{category}/{name}: source {} is gone", path.display());
                        report.push(&name, Change::SourceMissing, None);
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                let changed = self.refresh_entries(&mod_dir, &old, &new)?;
                record.set(&category, &name, new);
                report.push(&name, updated_or_unchanged(changed), None);
            }
        }

        record.flush()?;
        self.record = record;
        Ok(report)
    }

    /// Move the destination from the `old` entry list to the `new` one, both
    /// relative to `source_dir`. Returns whether anything was changed.
    fn refresh_entries(&self, source_dir: &Path, old: &[String], new: &[String]) -> Result<bool> {
        let layout = self.catalog.layout();
        let mut changed = false;

        for name in new.iter().filter(|n| !old.contains(*n)) {
            tracing::debug!("add {name}");
            tree_diff::sync_entry(&source_dir.join(name), &self.dest_root.join(name), layout)?;
            changed = true;
        }
        for name in old.iter().filter(|n| !new.contains(*n)) {
            tracing::debug!("drop {name}");
            tree_diff::remove_unprotected(&self.dest_root.join(name), layout)?;
            changed = true;
        }
        for name in new.iter().filter(|n| old.contains(*n)) {
            if tree_diff::sync_entry(&source_dir.join(name), &self.dest_root.join(name), layout)? {
                tracing::debug!("sync {name}");
                changed = true;
            }
        }
        Ok(changed)
    }
}

const fn updated_or_unchanged(changed: bool) -> Change {
    if changed {
        Change::Updated
    } else {
        Change::Unchanged
    }
}

/// Owned snapshot of one category, so the record can be mutated while
/// iterating.
fn installed_mods(record: &Record, category: &str) -> Vec<(String, Vec<String>)> {
    record
        .get(category)
        .map(|mods| {
            mods.iter()
                .map(|(name, files)| (name.clone(), files.clone()))
                .collect()
        })
        .unwrap_or_default()
}
