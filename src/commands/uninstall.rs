//! Uninstall command: remove the whole destination directory.
use anyhow::{Context as _, Result};

use super::{CommandSetup, GREEN, RESET, YELLOW, confirm};
use crate::cli::{GlobalOpts, UninstallOpts};
use crate::logging::Logger;
use crate::operations;

/// Run the uninstall command.
///
/// The destination is deleted as a whole, including files the operator put
/// there; backups made by `install` are left for manual recovery.
///
/// # Errors
///
/// Returns an error if nothing is installed or the directory cannot be
/// removed.
pub fn run(global: &GlobalOpts, opts: &UninstallOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let reconciler = setup.installed_reconciler()?;
    let dest = reconciler.dest_root();

    log.info(&format!(
        "{YELLOW}The directory '{}' will be removed, including your own files.{RESET}",
        dest.display()
    ));
    if !opts.yes && !confirm("Are you sure you want to uninstall?")? {
        log.info("Uninstall cancelled.");
        return Ok(());
    }

    log.stage("Uninstalling");
    operations::remove_entry(dest).with_context(|| format!("removing {}", dest.display()))?;
    log.info(&format!(
        "{GREEN}'{}' was successfully removed!{RESET}",
        dest.display()
    ));

    let name = dest
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    log.info(&format!(
        "{YELLOW}You have to manually rename '{name}.<timestamp>.bak' (if it exists) to \
         '{name}' to recover your previous configuration.{RESET}"
    ));
    Ok(())
}
