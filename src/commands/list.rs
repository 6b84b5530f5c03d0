//! List command: show what the record says is installed.
use anyhow::Result;

use super::{BLUE, CommandSetup, GREEN, RED, RESET};
use crate::cli::GlobalOpts;
use crate::config::THEME_CATEGORY;
use crate::logging::Logger;
use crate::reconcile::Reconciler;
use crate::record::ESSENTIAL;
use crate::resources::mod_files::ModFiles;
use crate::resources::{Resource as _, ResourceState};

/// Run the list command.
///
/// # Errors
///
/// Returns an error if nothing is installed yet or the destination cannot be
/// inspected.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let reconciler = setup.installed_reconciler()?;

    for line in render(&reconciler) {
        log.info(&line);
    }
    for warning in damaged(&reconciler)? {
        log.warn(&warning);
    }
    Ok(())
}

/// Lines describing the installed mods and theme.
fn render(reconciler: &Reconciler) -> Vec<String> {
    let record = reconciler.record();
    let categories: Vec<String> = record
        .categories()
        .into_iter()
        .filter(|c| c != THEME_CATEGORY)
        .collect();

    let mut lines = Vec::new();
    if categories.is_empty() {
        lines.push("Installed Mods: None".to_string());
    } else {
        lines.push("Installed Mods:".to_string());
        for category in &categories {
            lines.push(format!("{BLUE}* {category}{RESET}"));
            for name in record.get(category).into_iter().flat_map(|mods| mods.keys()) {
                lines.push(format!("  {RED}>{RESET} {name}"));
            }
        }
    }

    let theme = record
        .get(THEME_CATEGORY)
        .and_then(|themes| themes.keys().next())
        .map_or_else(|| "None".to_string(), |t| format!("{GREEN}{t}{RESET}"));
    lines.push(format!("Installed Theme: {theme}"));
    lines
}

/// One warning per recorded entry whose files are no longer all present.
fn damaged(reconciler: &Reconciler) -> Result<Vec<String>> {
    let record = reconciler.record();
    let catalog = reconciler.catalog();
    let dest = reconciler.dest_root();

    let mut resources = vec![ModFiles::new(
        ESSENTIAL,
        catalog.root(),
        dest,
        record.essential().unwrap_or_default().to_vec(),
    )];
    for category in record.categories() {
        for (name, files) in record.get(&category).into_iter().flatten() {
            resources.push(ModFiles::new(
                name.as_str(),
                &catalog.mod_dir(&category, name),
                dest,
                files.clone(),
            ));
        }
    }

    let mut warnings = Vec::new();
    for resource in &resources {
        let state = resource.current_state()?;
        if state == ResourceState::Present {
            continue;
        }
        warnings.push(format!(
            "{} is damaged ({}); run update to restore it",
            resource.label(),
            state.describe()
        ));
    }
    Ok(warnings)
}
