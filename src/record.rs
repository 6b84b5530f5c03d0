//! The persisted record of what is installed in the destination.
//!
//! The record is the single source of truth for *what to remove*: every path
//! listed for a mod was copied into the destination when the mod was
//! installed, and uninstalling deletes exactly those paths. The destination
//! is never re-scanned to rebuild the record.
//!
//! On disk the record is a comment line followed by one JSON document:
//!
//! ```text
//! // This file is maintained by Firefox Mod Blur Installer. ...
//! {"Tabs":{"Rounded tabs":["rounded.css"]},"essential":["userChrome.css","ASSETS"]}
//! ```
//!
//! `"essential"` maps to the baseline file list; every other key is a
//! category mapping mod name to its installed paths.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModError, Result};
use crate::operations;

/// First line of every record file. Skipped when parsing.
pub const DISCLAIMER: &str = "// This file is maintained by Firefox Mod Blur Installer. \
                              You should not modified it by yourself!";

/// Reserved key holding the essential file list.
pub const ESSENTIAL: &str = "essential";

/// Installed mods of one category: mod name to installed relative paths.
pub type ModEntries = BTreeMap<String, Vec<String>>;

/// One top-level value of the on-disk document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Files(Vec<String>),
    Mods(ModEntries),
}

/// Borrowed counterpart of [`RawEntry`] used when writing.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RawEntryRef<'a> {
    Files(&'a [String]),
    Mods(&'a ModEntries),
}

/// In-memory view of the record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    path: PathBuf,
    essential: Option<Vec<String>>,
    categories: BTreeMap<String, ModEntries>,
}

impl Record {
    /// Create an empty record that will be flushed to `path`.
    #[must_use]
    pub const fn empty(path: PathBuf) -> Self {
        Self {
            path,
            essential: None,
            categories: BTreeMap::new(),
        }
    }

    /// Load the record at `path`, or an empty record if no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::CorruptRecord`] if the body after the disclaimer
    /// line is not a valid record document, or [`ModError::Io`] if the file
    /// exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::empty(path.to_path_buf()));
            }
            Err(e) => return Err(ModError::io("read", path)(e)),
        };

        let corrupt = |reason: String| ModError::CorruptRecord {
            path: path.to_path_buf(),
            reason,
        };

        let body = content
            .split_once('\n')
            .map(|(_, body)| body)
            .ok_or_else(|| corrupt("missing document after comment line".to_string()))?;
        let raw: BTreeMap<String, RawEntry> =
            serde_json::from_str(body).map_err(|e| corrupt(e.to_string()))?;

        let mut record = Self::empty(path.to_path_buf());
        for (key, entry) in raw {
            match (key == ESSENTIAL, entry) {
                (true, RawEntry::Files(files)) => record.essential = Some(files),
                (true, RawEntry::Mods(_)) => {
                    return Err(corrupt(format!("'{ESSENTIAL}' must be a list of paths")));
                }
                (false, RawEntry::Mods(mods)) => {
                    if !mods.is_empty() {
                        record.categories.insert(key, mods);
                    }
                }
                (false, RawEntry::Files(_)) => {
                    return Err(corrupt(format!("category '{key}' must map mods to paths")));
                }
            }
        }
        Ok(record)
    }

    /// Location of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the essential set has been installed.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.essential.is_some()
    }

    /// Installed essential paths, if any.
    #[must_use]
    pub fn essential(&self) -> Option<&[String]> {
        self.essential.as_deref()
    }

    /// Replace the essential file list.
    pub fn set_essential(&mut self, files: Vec<String>) {
        self.essential = Some(files);
    }

    /// Installed mods of `category`.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&ModEntries> {
        self.categories.get(category)
    }

    /// Whether `category` has at least one installed mod.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Snapshot of the recorded category names.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Insert or replace the installed paths of `mod_name`.
    ///
    /// An empty `files` list is kept: it records a mod that is installed but
    /// copied nothing (manual-operation mods).
    pub fn set(&mut self, category: &str, mod_name: &str, files: Vec<String>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(mod_name.to_string(), files);
    }

    /// Delete the entry of `mod_name`, dropping the category when it becomes
    /// empty. Returns the removed path list.
    pub fn remove(&mut self, category: &str, mod_name: &str) -> Option<Vec<String>> {
        let mods = self.categories.get_mut(category)?;
        let removed = mods.remove(mod_name);
        if mods.is_empty() {
            self.categories.remove(category);
        }
        removed
    }

    /// Render the full file content: disclaimer line plus JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::CorruptRecord`] if serialization fails.
    pub fn to_document(&self) -> Result<String> {
        let mut doc: BTreeMap<&str, RawEntryRef<'_>> = self
            .categories
            .iter()
            .map(|(category, mods)| (category.as_str(), RawEntryRef::Mods(mods)))
            .collect();
        if let Some(files) = &self.essential {
            doc.insert(ESSENTIAL, RawEntryRef::Files(files));
        }
        let json = serde_json::to_string(&doc).map_err(|e| ModError::CorruptRecord {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(format!("{DISCLAIMER}\n{json}"))
    }

    /// Write the whole record, replacing the previous file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::Io`] if the file cannot be written.
    pub fn flush(&self) -> Result<()> {
        let document = self.to_document()?;
        operations::write_atomic(&self.path, document.as_bytes())?;
        tracing::debug!("wrote record {}", self.path.display());
        Ok(())
    }
}
