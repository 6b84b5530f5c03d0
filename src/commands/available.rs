//! Available command: browse what the source tree offers.
use anyhow::{Context as _, Result};

use super::{BLUE, RESET, load_catalog};
use crate::catalog::Catalog;
use crate::cli::{AvailableOpts, GlobalOpts};
use crate::config::THEME_CATEGORY;
use crate::logging::Logger;

/// Run the available command.
///
/// # Errors
///
/// Returns an error if the source tree cannot be resolved or the requested
/// category does not exist.
pub fn run(global: &GlobalOpts, opts: &AvailableOpts, log: &Logger) -> Result<()> {
    let catalog = load_catalog(global, log)?;
    let lines = match &opts.category {
        Some(category) => category_lines(&catalog, category)?,
        None => overview_lines(&catalog)?,
    };
    for line in lines {
        log.info(&line);
    }
    Ok(())
}

/// Every category with its mods marked single-choice where applicable, then
/// the themes.
fn overview_lines(catalog: &Catalog) -> Result<Vec<String>> {
    let mut lines = vec!["Mod categories:".to_string()];
    for category in catalog.categories().context("listing mod categories")? {
        let suffix = if catalog.layout().is_single_choice(&category) {
            " (choose one)"
        } else {
            ""
        };
        lines.push(format!("{BLUE}* {category}{RESET}{suffix}"));
    }
    lines.push("Themes:".to_string());
    for theme in catalog.themes().context("listing themes")? {
        lines.push(format!("  {theme}"));
    }
    Ok(lines)
}

/// The mods of one category (or the themes for `theme`).
fn category_lines(catalog: &Catalog, category: &str) -> Result<Vec<String>> {
    let names = if category == THEME_CATEGORY {
        catalog.themes()
    } else {
        catalog.mods(category)
    }
    .with_context(|| format!("unknown category '{category}'"))?;

    let mut lines = vec![format!("{BLUE}* {category}{RESET}")];
    lines.extend(names.into_iter().map(|name| format!("  {name}")));
    Ok(lines)
}
