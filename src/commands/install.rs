//! Install command: back up the destination and lay down the essential files.
use anyhow::{Context as _, Result};

use super::{CommandSetup, GREEN, RESET, YELLOW, confirm, log_report};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the source or destination cannot be resolved, the
/// operator declines, or any install step fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let version = option_env!("MODBLUR_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("modblur {version}"));

    let setup = CommandSetup::init(global, log)?;
    let mut reconciler = setup.install_reconciler();
    let dest = reconciler.dest_root().to_path_buf();

    if dest.symlink_metadata().is_ok() && !opts.yes {
        log.warn(&format!(
            "'{}' already exists and will be renamed to a backup",
            dest.display()
        ));
        if !confirm("Continue with the install?")? {
            log.info("Install cancelled.");
            return Ok(());
        }
    }

    log.stage("Installing essential files");
    let report = reconciler
        .install_essentials()
        .with_context(|| format!("installing into {}", dest.display()))?;
    if let Some(backup) = &report.backup {
        log.info(&format!(
            "{YELLOW}'{}' already existed, so it was renamed to '{}'{RESET}",
            dest.display(),
            backup.display()
        ));
    }
    log_report(&report, log);
    log.info(&format!(
        "{GREEN}Successfully installed to '{}'!{RESET}",
        dest.display()
    ));
    log.info(&format!(
        "{YELLOW}Remember to set `toolkit.legacyUserProfileCustomizations.stylesheets` \
         to `true` in `about:config`!{RESET}"
    ));

    log.print_summary();
    Ok(())
}
