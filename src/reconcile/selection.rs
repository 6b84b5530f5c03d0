//! Replace the installed mods of one category with a desired set.
use std::collections::BTreeSet;

use super::{Change, Reconciler, Report};
use crate::error::Result;
use crate::resources::{Applicable, ResourceChange};
use crate::resources::mod_files::ModFiles;

impl Reconciler {
    /// Make `desired` the exact set of installed mods of `category`.
    ///
    /// Recorded mods missing from `desired` are uninstalled first, then mods
    /// in `desired` that are not yet recorded are installed. Mods in both are
    /// left alone. Duplicates in `desired` are ignored. Installed mods carry
    /// their notes; uninstalled mods carry notes only when they recorded no
    /// files, since those were set up by hand and must be undone by hand.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ModError::MissingSourceEntry`] if a mod to
    /// install has no source directory, or [`crate::error::ModError::Io`]
    /// if a file operation or the record flush fails. The record is left
    /// unchanged on error.
    pub fn apply_selection(&mut self, category: &str, desired: &[String]) -> Result<Report> {
        let mut record = self.record.clone();
        let recorded: BTreeSet<String> = record
            .get(category)
            .map(|mods| mods.keys().cloned().collect())
            .unwrap_or_default();

        let mut seen = BTreeSet::new();
        let to_install: Vec<&String> = desired
            .iter()
            .filter(|name| !recorded.contains(*name) && seen.insert(name.as_str()))
            .collect();
        let to_uninstall: Vec<&String> = recorded
            .iter()
            .filter(|name| !desired.contains(*name))
            .collect();

        let mut report = Report::default();

        for name in to_uninstall {
            let mod_dir = self.catalog.mod_dir(category, name);
            let files = record.remove(category, name).unwrap_or_default();
            let notes = if files.is_empty() {
                self.catalog.notes(&mod_dir)?
            } else {
                None
            };
            let resource = ModFiles::new(name.as_str(), &mod_dir, &self.dest_root, files);
            tracing::debug!("uninstall {}", resource.description());
            if let ResourceChange::Skipped { reason } = resource.remove()? {
                tracing::debug!("{name}: {reason}");
            }
            report.push(name, Change::Uninstalled, notes);
        }

        for name in to_install {
            let mod_dir = self.catalog.mod_dir(category, name);
            let files = self.catalog.stylesheet_entries(&mod_dir)?;
            let resource = ModFiles::new(name.as_str(), &mod_dir, &self.dest_root, files);
            tracing::debug!("install {}", resource.description());
            if let ResourceChange::Skipped { reason } = resource.apply()? {
                tracing::debug!("{name}: {reason}");
            }
            let notes = self.catalog.notes(&mod_dir)?;
            record.set(category, name, resource.into_files());
            report.push(name, Change::Installed, notes);
        }

        record.flush()?;
        self.record = record;
        Ok(report)
    }
}
