//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the mod installer.
#[derive(Parser, Debug)]
#[command(
    name = "modblur",
    about = "Install, select and update optional CSS mods and themes in a browser profile",
    version = option_env!("MODBLUR_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Destination and source selection shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the browser profile directory; with --exact, the destination
    /// directory itself
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// DIRECTORY is the destination directory, not the profile holding it
    #[arg(short, long, global = true)]
    pub exact: bool,

    /// Source tree root (defaults to $MODBLUR_SOURCE, the repository holding
    /// the binary, or the current directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub source: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Back up any existing destination and install the essential files
    Install(InstallOpts),
    /// Set the installed mods of a category (no mods clears the category)
    Mods(ModsOpts),
    /// Select the theme (no theme clears it)
    Theme(ThemeOpts),
    /// Refresh the essential files and every installed mod from the source
    Update,
    /// Show the installed mods and theme
    List,
    /// Show the categories, mods and themes the source tree offers
    Available(AvailableOpts),
    /// Remove the destination directory
    Uninstall(UninstallOpts),
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Mods(_) => "mods",
            Self::Theme(_) => "theme",
            Self::Update => "update",
            Self::List => "list",
            Self::Available(_) => "available",
            Self::Uninstall(_) => "uninstall",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Do not ask before moving an existing destination aside
    #[arg(short, long)]
    pub yes: bool,
}

/// Options for the `mods` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ModsOpts {
    /// Mod category (a directory under the source's mods directory)
    pub category: String,

    /// Mods to keep installed; mods of the category not listed are removed
    pub mods: Vec<String>,
}

/// Options for the `theme` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ThemeOpts {
    /// Theme to install, replacing the current one
    pub theme: Option<String>,
}

/// Options for the `available` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AvailableOpts {
    /// Show the mods of this category instead of the category list
    pub category: Option<String>,
}

/// Options for the `uninstall` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UninstallOpts {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
