//! Reconciliation of the destination against the record and the source tree.
//!
//! A [`Reconciler`] owns the loaded [`Record`] for one destination. Each
//! public operation works on a copy of the record, performs every file
//! operation, flushes the copy and only then adopts it, so a failed call
//! leaves both the in-memory and the on-disk record at their previous state.
mod refresh;
mod selection;

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::{ModError, Result};
use crate::record::{ESSENTIAL, Record};
use crate::resources::mod_files::ModFiles;
use crate::resources::{Applicable, ResourceChange, backup};

/// What happened to one mod (or the essential set) during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Copied into the destination and recorded.
    Installed,
    /// Removed from the destination and the record.
    Uninstalled,
    /// Destination brought in line with a changed source.
    Updated,
    /// Destination already matched the source.
    Unchanged,
    /// The mod's source directory is gone; nothing was touched.
    SourceMissing,
}

impl Change {
    /// Whether the destination was modified.
    #[must_use]
    pub const fn is_modification(self) -> bool {
        matches!(self, Self::Installed | Self::Uninstalled | Self::Updated)
    }
}

/// One line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Mod name, or `essential` for the baseline set.
    pub name: String,
    /// What happened.
    pub change: Change,
    /// Notes file contents to show the operator, if any.
    pub notes: Option<String>,
}

/// Ordered outcome of a reconciliation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Per-mod outcomes in processing order.
    pub entries: Vec<ReportEntry>,
    /// Where a pre-existing destination was moved by `install_essentials`.
    pub backup: Option<PathBuf>,
}

impl Report {
    fn push(&mut self, name: &str, change: Change, notes: Option<String>) {
        self.entries.push(ReportEntry {
            name: name.to_string(),
            change,
            notes,
        });
    }

    /// Whether any entry modified the destination.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.entries.iter().any(|e| e.change.is_modification())
    }

    /// Look up the entry for `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Drives installs, selections and updates for one destination directory.
#[derive(Debug)]
pub struct Reconciler {
    catalog: Catalog,
    dest_root: PathBuf,
    record: Record,
}

impl Reconciler {
    /// Open the destination `dest_root`, loading its record if present.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::CorruptRecord`] or [`ModError::Io`] if an existing
    /// record cannot be loaded.
    pub fn open(catalog: Catalog, dest_root: PathBuf) -> Result<Self> {
        let record = Record::load(&dest_root.join(&catalog.layout().record_file))?;
        Ok(Self {
            catalog,
            dest_root,
            record,
        })
    }

    /// Target `dest_root` for a fresh install without reading its record.
    ///
    /// [`install_essentials`](Self::install_essentials) moves the existing
    /// destination aside and starts a new record, so a corrupt or unreadable
    /// record must not block it.
    #[must_use]
    pub fn for_install(catalog: Catalog, dest_root: PathBuf) -> Self {
        let record = Record::empty(dest_root.join(&catalog.layout().record_file));
        Self {
            catalog,
            dest_root,
            record,
        }
    }

    /// Current record.
    #[must_use]
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Source tree catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Destination directory.
    #[must_use]
    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Fail with [`ModError::NotInstalled`] unless the essential set is recorded.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn require_installed(&self) -> Result<()> {
        if self.record.is_installed() {
            Ok(())
        } else {
            Err(ModError::NotInstalled {
                path: self.dest_root.clone(),
            })
        }
    }

    /// First install: move any existing destination aside, recreate it, copy
    /// the essential stylesheets and asset bundle, and start a fresh record.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] if the source tree has no
    /// asset bundle, or [`ModError::Io`] if any filesystem step fails.
    pub fn install_essentials(&mut self) -> Result<Report> {
        let entries = self.catalog.essential_entries()?;

        let mut report = Report {
            backup: backup::backup_existing(&self.dest_root)?,
            ..Report::default()
        };
        fs::create_dir_all(&self.dest_root)
            .map_err(ModError::io("create directory", &self.dest_root))?;

        let files = ModFiles::new(ESSENTIAL, self.catalog.root(), &self.dest_root, entries);
        if let ResourceChange::Skipped { reason } = files.apply()? {
            tracing::debug!("{ESSENTIAL}: {reason}");
        }

        let mut record = Record::empty(self.record.path().to_path_buf());
        record.set_essential(files.into_files());
        record.flush()?;
        self.record = record;

        report.push(ESSENTIAL, Change::Installed, None);
        Ok(report)
    }
}
