//! Mods command: replace the installed mods of one category.
use anyhow::{Context as _, Result};

use super::{CommandSetup, RESET, YELLOW, log_report, recorded_mods, validate_selection};
use crate::cli::{GlobalOpts, ModsOpts};
use crate::config::THEME_CATEGORY;
use crate::logging::Logger;

/// Run the mods command.
///
/// # Errors
///
/// Returns an error if the selection is invalid, nothing is installed yet,
/// or a mod cannot be installed or removed.
pub fn run(global: &GlobalOpts, opts: &ModsOpts, log: &Logger) -> Result<()> {
    if opts.category == THEME_CATEGORY {
        anyhow::bail!("'{THEME_CATEGORY}' is reserved; use the theme command");
    }

    let mut reconciler = CommandSetup::init(global, log)?.installed_reconciler()?;
    let catalog = reconciler.catalog();
    let recorded = recorded_mods(reconciler.record(), &opts.category);
    validate_selection(catalog, &opts.category, &opts.mods, &recorded)?;

    if let Some(notes) = catalog.notes(&catalog.category_dir(&opts.category))? {
        log.info(&format!("{YELLOW}{notes}{RESET}"));
    }

    log.stage(&format!("Selecting mods of '{}'", opts.category));
    let report = reconciler
        .apply_selection(&opts.category, &opts.mods)
        .with_context(|| format!("applying selection for '{}'", opts.category))?;

    if report.entries.is_empty() {
        log.info("Selection unchanged.");
    }
    log_report(&report, log);
    log.print_summary();
    Ok(())
}
