//! Domain-specific error types for the mod engine.
//!
//! The engine modules ([`record`](crate::record), [`tree_diff`](crate::tree_diff),
//! [`reconcile`](crate::reconcile), ...) return [`ModError`]; command handlers
//! at the CLI boundary convert it to [`anyhow::Error`] with the `?` operator.
//!
//! ```text
//! ModError
//! ├── CorruptRecord       record body is not valid JSON
//! ├── MissingSourceEntry  mod/theme directory vanished from the source tree
//! ├── Io                  copy/remove/rename/read/write failure
//! ├── NotInstalled        no record where one is required
//! └── InvalidSelection    rejected at the selection boundary
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T, E = ModError> = std::result::Result<T, E>;

/// Errors raised while reconciling mods against the destination directory.
#[derive(Error, Debug)]
pub enum ModError {
    /// The record file exists but its body cannot be parsed.
    #[error("record file {} is corrupt: {reason}", path.display())]
    CorruptRecord {
        /// Location of the record file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A mod or theme directory referenced by the record is gone.
    #[error("source entry not found: {}", path.display())]
    MissingSourceEntry {
        /// Directory that was expected in the source tree.
        path: PathBuf,
    },

    /// A filesystem operation failed. Never retried.
    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        /// Short name of the failed operation (e.g. `"copy"`).
        op: &'static str,
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// No installation record exists at the destination.
    #[error("nothing is installed at {}; run `install` first", path.display())]
    NotInstalled {
        /// Destination directory that was inspected.
        path: PathBuf,
    },

    /// A requested selection was rejected before reaching the engine.
    #[error("invalid selection for '{category}': {reason}")]
    InvalidSelection {
        /// Category the selection was made for.
        category: String,
        /// Why the selection was rejected.
        reason: String,
    },
}

impl ModError {
    /// Build a `map_err` adapter that wraps an [`io::Error`] with the
    /// operation name and path.
    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io { op, path, source }
    }
}
