//! Installable units placed in the destination, and the guards around them.
pub mod backup;
pub mod mod_files;

use crate::error::Result;

/// A set of destination entries that can be copied in and taken out again.
pub trait Applicable {
    /// Short label used in debug output.
    fn description(&self) -> String;

    /// Copy the entries into the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if a source entry is missing or a copy fails.
    fn apply(&self) -> Result<ResourceChange>;

    /// Delete the entries from the destination. Entries that are already
    /// gone are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be deleted.
    fn remove(&self) -> Result<ResourceChange>;
}

/// How much of a resource is present in the destination.
///
/// # Examples
///
/// ```
/// use modblur_cli::resources::ResourceState;
///
/// let damaged = ResourceState::Damaged { missing: vec!["tabs.css".into()] };
/// assert_ne!(damaged, ResourceState::Present);
/// assert_eq!(damaged.describe(), "missing: tabs.css");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Every entry exists.
    Present,
    /// No entry exists.
    Missing,
    /// Some entries exist and the listed ones do not.
    Damaged {
        /// Entry names absent from the destination.
        missing: Vec<String>,
    },
}

impl ResourceState {
    /// One-line summary for warnings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Present => "complete".to_string(),
            Self::Missing => "all files missing".to_string(),
            Self::Damaged { missing } => format!("missing: {}", missing.join(", ")),
        }
    }
}

/// What an apply or remove call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Entries were copied or deleted.
    Applied,
    /// Nothing was touched, e.g. a manual mod without stylesheets.
    Skipped {
        /// Why nothing was touched.
        reason: String,
    },
}

/// A resource that can also inspect its own state in the destination.
pub trait Resource: Applicable {
    /// Check which entries are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;
}
