//! The files one mod (or the essential set) places in the destination root.
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::{ModError, Result};
use crate::operations;

/// Top-level entries copied flat from a source directory into the
/// destination root.
///
/// `files` are names relative to both `source_dir` and `dest_root`; an entry
/// may be a file or a directory (the essential asset bundle).
#[derive(Debug, Clone)]
pub struct ModFiles {
    label: String,
    source_dir: PathBuf,
    dest_root: PathBuf,
    files: Vec<String>,
}

impl ModFiles {
    /// Describe the entries `files` of `source_dir` as installed in `dest_root`.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        source_dir: &Path,
        dest_root: &Path,
        files: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            source_dir: source_dir.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            files,
        }
    }

    /// Mod name (or `essential`).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the resource, returning its entry names for the record.
    #[must_use]
    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

impl Applicable for ModFiles {
    fn description(&self) -> String {
        format!("{} ({} entries)", self.label, self.files.len())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.files.is_empty() {
            return Ok(ResourceChange::Skipped {
                reason: "no stylesheet entries".to_string(),
            });
        }
        std::fs::create_dir_all(&self.dest_root)
            .map_err(ModError::io("create directory", &self.dest_root))?;
        for file in &self.files {
            tracing::debug!("copy {file} -> {}", self.dest_root.display());
            operations::copy_entry(&self.source_dir.join(file), &self.dest_root)?;
        }
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if self.files.is_empty() {
            return Ok(ResourceChange::Skipped {
                reason: "no recorded files".to_string(),
            });
        }
        for file in &self.files {
            tracing::debug!("remove {file}");
            operations::remove_entry(&self.dest_root.join(file))?;
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ModFiles {
    fn current_state(&self) -> Result<ResourceState> {
        let missing: Vec<String> = self
            .files
            .iter()
            .filter(|f| self.dest_root.join(f).symlink_metadata().is_err())
            .cloned()
            .collect();

        Ok(if missing.is_empty() {
            ResourceState::Present
        } else if missing.len() == self.files.len() {
            ResourceState::Missing
        } else {
            ResourceState::Damaged { missing }
        })
    }
}
