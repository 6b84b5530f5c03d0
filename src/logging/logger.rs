//! Structured logger with change collection and a run summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{ChangeEntry, Log};
use super::utils::log_file_path;
use crate::reconcile::Change;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_change` method is **not** included because its signature
/// differs from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/modblur/<command>.log` (default `~/.cache/modblur/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    changes: Mutex<Vec<ChangeEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            changes: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded changes (test-only).
    #[cfg(test)]
    pub(crate) fn change_entries(&self) -> Vec<ChangeEntry> {
        self.changes.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a change for the summary.
    pub fn record_change(&self, name: &str, change: Change) {
        if let Ok(mut guard) = self.changes.lock() {
            guard.push(ChangeEntry {
                name: name.to_string(),
                change,
            });
        }
    }

    /// Number of recorded entries with the given outcome.
    #[must_use]
    pub fn count(&self, change: Change) -> usize {
        self.changes
            .lock()
            .map_or(0, |guard| guard.iter().filter(|e| e.change == change).count())
    }

    /// Print the one-line summary of all recorded changes.
    ///
    /// Nothing is printed when no change was recorded.
    pub fn print_summary(&self) {
        let total = self.changes.lock().map_or(0, |guard| guard.len());
        if total == 0 {
            return;
        }

        self.info(&format!(
            "{total} entries: \x1b[32m{} installed\x1b[0m, \x1b[31m{} uninstalled\x1b[0m, \
             \x1b[36m{} updated\x1b[0m, \x1b[2m{} unchanged\x1b[0m, \x1b[33m{} missing\x1b[0m",
            self.count(Change::Installed),
            self.count(Change::Uninstalled),
            self.count(Change::Updated),
            self.count(Change::Unchanged),
            self.count(Change::SourceMissing),
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn);

    fn record_change(&self, name: &str, change: Change) {
        self.record_change(name, change);
    }
}
