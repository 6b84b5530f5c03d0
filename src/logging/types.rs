//! Core logging types: change entries and the [`Log`] trait.
use crate::reconcile::Change;

/// One reported change, kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Mod name, or `essential` for the baseline set.
    pub name: String,
    /// What happened to it.
    pub change: Change,
}

/// Abstraction over logging backends.
///
/// Command code logs through this trait so tests can substitute a logger
/// bound to an isolated subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Record a change for the summary.
    fn record_change(&self, name: &str, change: Change);
}
