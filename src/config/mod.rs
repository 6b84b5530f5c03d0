//! Source-tree layout conventions and their optional TOML override.
pub mod toml_loader;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional layout override file at the source root.
pub const LAYOUT_FILE: &str = "modblur.toml";

/// Category name that stores the single selected theme.
pub const THEME_CATEGORY: &str = "theme";

/// Fixed names that tie the source tree, the destination and the record
/// together.
///
/// Every field has a default matching the upstream repository layout; a
/// `modblur.toml` at the source root may override any subset of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Layout {
    /// Directory (under the source root) holding one directory per mod category.
    pub mods_dir: String,
    /// Directory (under the source root) holding the themes.
    pub themes_dir: String,
    /// Asset bundle copied with the essential stylesheets.
    pub assets_dir: String,
    /// Documentation file shown as "notes" on install and uninstall.
    pub notes_file: String,
    /// Substring that marks an entry as an installable stylesheet.
    pub stylesheet_marker: String,
    /// Base name that is never compared, added or removed during updates.
    pub protected_name: String,
    /// Reserved name of the record file inside the destination.
    pub record_file: String,
    /// Name of the destination directory inside a profile.
    pub destination_dir: String,
    /// Mod categories that allow at most one selected mod.
    pub single_choice_categories: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            mods_dir: "EXTRA MODS".to_string(),
            themes_dir: "EXTRA THEMES".to_string(),
            assets_dir: "ASSETS".to_string(),
            notes_file: "README.md".to_string(),
            stylesheet_marker: ".css".to_string(),
            protected_name: "wallpaper".to_string(),
            record_file: ".firefox-mod-blur.jsonc".to_string(),
            destination_dir: "chrome".to_string(),
            single_choice_categories: vec![
                "Auto hide Mods".to_string(),
                "Compact extensions menu".to_string(),
                "Min-max-close control buttons".to_string(),
            ],
        }
    }
}

impl Layout {
    /// Load the layout for `source_root`, falling back to defaults for any
    /// key (or the whole file) that is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `modblur.toml` exists but cannot be read or parsed.
    pub fn load(source_root: &Path) -> Result<Self> {
        toml_loader::load_config(&source_root.join(LAYOUT_FILE))
            .with_context(|| format!("loading {LAYOUT_FILE}"))
    }

    /// Whether `category` accepts at most one selected mod.
    #[must_use]
    pub fn is_single_choice(&self, category: &str) -> bool {
        category == THEME_CATEGORY || self.single_choice_categories.iter().any(|c| c == category)
    }

    /// Whether `name` is the protected (user-owned) entry name.
    #[must_use]
    pub fn is_protected(&self, name: &str) -> bool {
        name == self.protected_name
    }

    /// Whether a directory entry called `name` counts as a stylesheet.
    #[must_use]
    pub fn is_stylesheet(&self, name: &str) -> bool {
        name.contains(&self.stylesheet_marker)
    }

    /// Resolve the destination directory for a user-supplied `path`.
    ///
    /// With `exact` the path is the destination itself; otherwise it is a
    /// profile directory containing [`destination_dir`](Self::destination_dir).
    #[must_use]
    pub fn destination_for(&self, path: &Path, exact: bool) -> PathBuf {
        if exact {
            path.to_path_buf()
        } else {
            path.join(&self.destination_dir)
        }
    }
}
