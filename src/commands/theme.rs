//! Theme command: select (or clear) the single installed theme.
use anyhow::{Context as _, Result};

use super::{CommandSetup, log_report, recorded_mods, validate_selection};
use crate::cli::{GlobalOpts, ThemeOpts};
use crate::config::THEME_CATEGORY;
use crate::logging::Logger;

/// Run the theme command.
///
/// # Errors
///
/// Returns an error if the theme is unknown, nothing is installed yet, or
/// the theme cannot be swapped.
pub fn run(global: &GlobalOpts, opts: &ThemeOpts, log: &Logger) -> Result<()> {
    let mut reconciler = CommandSetup::init(global, log)?.installed_reconciler()?;
    let desired: Vec<String> = opts.theme.iter().cloned().collect();
    let recorded = recorded_mods(reconciler.record(), THEME_CATEGORY);
    validate_selection(reconciler.catalog(), THEME_CATEGORY, &desired, &recorded)?;

    log.stage("Selecting theme");
    let report = reconciler
        .apply_selection(THEME_CATEGORY, &desired)
        .context("applying theme selection")?;

    if report.entries.is_empty() {
        log.info("Theme unchanged.");
    }
    log_report(&report, log);
    log.print_summary();
    Ok(())
}
