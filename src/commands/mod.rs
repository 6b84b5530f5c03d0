//! Top-level subcommand orchestration.
pub mod available;
pub mod install;
pub mod list;
pub mod mods;
pub mod theme;
pub mod uninstall;
pub mod update;

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::catalog::Catalog;
use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::{LAYOUT_FILE, Layout, THEME_CATEGORY};
use crate::error::ModError;
use crate::logging::{Log, Logger};
use crate::reconcile::{Change, Reconciler, Report};
use crate::record::{ESSENTIAL, Record};

pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const BLUE: &str = "\x1b[34m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const RESET: &str = "\x1b[0m";

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns the error of the selected command.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    match &cli.command {
        Command::Install(opts) => install::run(&cli.global, opts, log),
        Command::Mods(opts) => mods::run(&cli.global, opts, log),
        Command::Theme(opts) => theme::run(&cli.global, opts, log),
        Command::Update => update::run(&cli.global, log),
        Command::List => list::run(&cli.global, log),
        Command::Available(opts) => available::run(&cli.global, opts, log),
        Command::Uninstall(opts) => uninstall::run(&cli.global, opts, log),
    }
}

/// Shared state produced by the common command setup sequence.
///
/// Resolves the source tree, loads its layout and works out the destination
/// so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Read-only view of the source tree.
    pub catalog: Catalog,
    /// Directory the mods are installed into.
    pub dest_root: PathBuf,
}

impl CommandSetup {
    /// Resolve the source root and destination and load the layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root cannot be determined, its layout
    /// file fails to parse, or the profile directory does not exist.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let catalog = load_catalog(global, log)?;
        let dest_root = resolve_destination(global, catalog.layout())?;
        log.debug(&format!("destination: {}", dest_root.display()));
        Ok(Self { catalog, dest_root })
    }

    /// Open the destination and load its record.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be read or parsed.
    pub fn reconciler(self) -> Result<Reconciler> {
        let dest = self.dest_root.clone();
        Reconciler::open(self.catalog, self.dest_root)
            .with_context(|| format!("opening {}", dest.display()))
    }

    /// Target the destination for a fresh install, ignoring any existing
    /// record.
    #[must_use]
    pub fn install_reconciler(self) -> Reconciler {
        Reconciler::for_install(self.catalog, self.dest_root)
    }

    /// Open the destination and require a completed install.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be loaded or the essential files
    /// were never installed.
    pub fn installed_reconciler(self) -> Result<Reconciler> {
        let reconciler = self.reconciler()?;
        reconciler
            .require_installed()
            .context("run the install command first")?;
        Ok(reconciler)
    }
}

/// Resolve the source tree and load its layout.
///
/// # Errors
///
/// Returns an error if the source root cannot be determined or its layout
/// file fails to parse.
pub fn load_catalog(global: &GlobalOpts, log: &Logger) -> Result<Catalog> {
    let source = resolve_source(global)?;
    log.debug(&format!("source: {}", source.display()));
    let layout = Layout::load(&source)?;
    Ok(Catalog::new(source, layout))
}

/// Whether `dir` looks like a source tree.
fn is_source_root(dir: &Path) -> bool {
    dir.join(LAYOUT_FILE).is_file() || dir.join(&Layout::default().mods_dir).is_dir()
}

/// Resolve the source tree root from CLI arguments or auto-detection.
///
/// Order: `--source`, `$MODBLUR_SOURCE`, the repository the binary was built
/// in (`target/<profile>/` or `bin/` below it), then the current directory.
///
/// # Errors
///
/// Returns an error if no candidate exists or can be canonicalized.
pub fn resolve_source(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref source) = global.source {
        return dunce::canonicalize(source)
            .with_context(|| format!("source directory {}", source.display()));
    }

    if let Ok(source) = std::env::var("MODBLUR_SOURCE") {
        return dunce::canonicalize(&source).with_context(|| format!("MODBLUR_SOURCE={source}"));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/release/ -> repo root
            parent.join(".."),    // bin/ -> repo root
        ];
        for candidate in &candidates {
            if is_source_root(candidate) {
                return Ok(dunce::canonicalize(candidate)?);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    if is_source_root(&cwd) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine the source tree. Use --source or set MODBLUR_SOURCE");
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

/// Work out the destination directory from `DIRECTORY` and `--exact`.
///
/// # Errors
///
/// Returns an error if the profile directory does not exist or the path
/// cannot be made absolute.
pub fn resolve_destination(global: &GlobalOpts, layout: &Layout) -> Result<PathBuf> {
    let given = expand_home(&global.directory);
    if global.exact {
        return std::path::absolute(&given)
            .with_context(|| format!("destination {}", given.display()));
    }
    let profile = dunce::canonicalize(&given)
        .with_context(|| format!("profile directory {} does not exist", given.display()))?;
    Ok(profile.join(&layout.destination_dir))
}

/// Check a requested selection against what the source tree offers.
///
/// Names in `recorded` (the mods currently installed for `category`) stay
/// valid after their source is gone, so they can still be kept or removed.
///
/// # Errors
///
/// Returns [`ModError::InvalidSelection`] for an unknown category or mod, or
/// more than one mod in a single-choice category.
pub fn validate_selection(
    catalog: &Catalog,
    category: &str,
    selection: &[String],
    recorded: &[String],
) -> crate::error::Result<()> {
    let invalid = |reason: String| ModError::InvalidSelection {
        category: category.to_string(),
        reason,
    };

    let listing = if category == THEME_CATEGORY {
        catalog.themes()
    } else {
        catalog.mods(category)
    };
    let offered = match listing {
        Ok(offered) => offered,
        Err(ModError::MissingSourceEntry { .. }) if !recorded.is_empty() => Vec::new(),
        Err(ModError::MissingSourceEntry { .. }) => {
            return Err(invalid("no such category".to_string()));
        }
        Err(e) => return Err(e),
    };

    if let Some(unknown) = selection
        .iter()
        .find(|name| !offered.contains(*name) && !recorded.contains(*name))
    {
        return Err(invalid(format!("unknown mod '{unknown}'")));
    }

    let distinct: BTreeSet<&String> = selection.iter().collect();
    if catalog.layout().is_single_choice(category) && distinct.len() > 1 {
        return Err(invalid("only one mod may be selected".to_string()));
    }
    Ok(())
}

/// Names of the mods recorded for `category`.
#[must_use]
pub fn recorded_mods(record: &Record, category: &str) -> Vec<String> {
    record
        .get(category)
        .map(|mods| mods.keys().cloned().collect())
        .unwrap_or_default()
}

/// Display name of a report entry.
fn display_name(name: &str) -> String {
    if name == ESSENTIAL {
        "essential files".to_string()
    } else {
        format!("'{name}'")
    }
}

/// Print one result line per report entry, followed by any notes, and
/// record each change for the summary.
pub fn log_report(report: &Report, log: &dyn Log) {
    for entry in &report.entries {
        let name = display_name(&entry.name);
        match entry.change {
            Change::Installed => {
                log.info(&format!("{GREEN}[+] {name} was successfully installed!{RESET}"));
            }
            Change::Uninstalled => {
                log.info(&format!("{GREEN}[-] {name} was successfully uninstalled!{RESET}"));
            }
            Change::Updated if entry.name == ESSENTIAL => {
                log.info(&format!("{GREEN}[^] essential files were successfully updated!{RESET}"));
            }
            Change::Updated => {
                let bare = &entry.name;
                log.info(&format!("{GREEN}[^] {bare} was successfully updated!{RESET}"));
            }
            Change::Unchanged => log.info(&format!("[=] there is no update for {name}.")),
            Change::SourceMissing => {
                log.warn(&format!("[!] {name} is gone from the source tree; left installed"));
            }
        }
        if let Some(notes) = &entry.notes {
            log.info(&format!("{YELLOW}Notes of {name}:{RESET}"));
            log.info(&format!("{YELLOW}{notes}{RESET}"));
        }
        log.record_change(&entry.name, entry.change);
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or stdin cannot be read.
pub fn confirm(question: &str) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{question} [y/N]: ").context("writing prompt")?;
    stdout.flush().context("flushing stdout")?;
    drop(stdout);
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("reading confirmation")?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
