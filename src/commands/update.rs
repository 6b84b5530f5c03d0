//! Update command: refresh everything installed from the source tree.
use anyhow::{Context as _, Result};

use super::{CommandSetup, RESET, YELLOW, log_report};
use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the update command.
///
/// # Errors
///
/// Returns an error if nothing is installed yet or a file operation fails.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let mut reconciler = setup.installed_reconciler()?;

    log.stage("Updating");
    let report = reconciler.refresh().context("updating installed files")?;
    log_report(&report, log);

    if !report.changed() {
        log.info(&format!(
            "{YELLOW}Note: you have to pull the repository by yourself!{RESET}"
        ));
    }
    log.print_summary();
    Ok(())
}
