//! Read-only view of the source tree: what can be installed, and from where.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{Layout, THEME_CATEGORY};
use crate::error::{ModError, Result};

/// Source tree rooted at the repository checkout.
///
/// ```text
/// <root>/userChrome.css ...    essential stylesheets
/// <root>/ASSETS/               essential asset bundle
/// <root>/EXTRA MODS/<category>/<mod>[/<mod>...]/
/// <root>/EXTRA THEMES/<theme>[/<theme>...]/   (leaf directories only)
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    layout: Layout,
}

impl Catalog {
    /// Create a catalog over `root`.
    #[must_use]
    pub const fn new(root: PathBuf, layout: Layout) -> Self {
        Self { root, layout }
    }

    /// Source tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Layout conventions in effect.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Directory holding one directory per mod category.
    #[must_use]
    pub fn mods_dir(&self) -> PathBuf {
        self.root.join(&self.layout.mods_dir)
    }

    /// Directory holding the themes.
    #[must_use]
    pub fn themes_dir(&self) -> PathBuf {
        self.root.join(&self.layout.themes_dir)
    }

    /// Directory whose subdirectories are the mods of `category`.
    #[must_use]
    pub fn category_dir(&self, category: &str) -> PathBuf {
        if category == THEME_CATEGORY {
            self.themes_dir()
        } else {
            self.mods_dir().join(category)
        }
    }

    /// Source directory of one mod (or theme).
    #[must_use]
    pub fn mod_dir(&self, category: &str, mod_name: &str) -> PathBuf {
        self.category_dir(category).join(mod_name)
    }

    /// Sorted names of the stylesheet entries directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] if `dir` is not a directory and
    /// [`ModError::Io`] if it cannot be listed.
    pub fn stylesheet_entries(&self, dir: &Path) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Err(ModError::MissingSourceEntry {
                path: dir.to_path_buf(),
            });
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(ModError::io("read directory", dir))? {
            let name = entry
                .map_err(ModError::io("read directory", dir))?
                .file_name()
                .to_string_lossy()
                .into_owned();
            if self.layout.is_stylesheet(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// The essential set as it currently exists in the source tree: root
    /// stylesheets followed by the asset bundle.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] if the root or the asset bundle
    /// is missing.
    pub fn essential_entries(&self) -> Result<Vec<String>> {
        let mut entries = self.stylesheet_entries(&self.root)?;
        let assets = self.root.join(&self.layout.assets_dir);
        if !assets.is_dir() {
            return Err(ModError::MissingSourceEntry { path: assets });
        }
        entries.push(self.layout.assets_dir.clone());
        Ok(entries)
    }

    /// Sorted mod categories.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] if the mods directory is
    /// missing.
    pub fn categories(&self) -> Result<Vec<String>> {
        let dir = self.mods_dir();
        if !dir.is_dir() {
            return Err(ModError::MissingSourceEntry { path: dir });
        }
        let mut categories = Vec::new();
        for entry in fs::read_dir(&dir).map_err(ModError::io("read directory", &dir))? {
            let entry = entry.map_err(ModError::io("read directory", &dir))?;
            if entry.path().is_dir() {
                categories.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        categories.sort();
        Ok(categories)
    }

    /// Sorted mods of `category`: every directory below the category
    /// directory, as a path relative to it (mods may nest).
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] for an unknown category.
    pub fn mods(&self, category: &str) -> Result<Vec<String>> {
        walk_dirs(&self.category_dir(category), false)
    }

    /// Sorted themes: leaf directories below the themes directory.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::MissingSourceEntry`] if the themes directory is
    /// missing.
    pub fn themes(&self) -> Result<Vec<String>> {
        walk_dirs(&self.themes_dir(), true)
    }

    /// Contents of the notes file in `dir`, trailing whitespace trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ModError::Io`] if the notes file exists but cannot be read.
    pub fn notes(&self, dir: &Path) -> Result<Option<String>> {
        let path = dir.join(&self.layout.notes_file);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(ModError::io("read", &path))?;
        Ok(Some(text.trim_end().to_string()))
    }
}

fn walk_dirs(base: &Path, leaves_only: bool) -> Result<Vec<String>> {
    if !base.is_dir() {
        return Err(ModError::MissingSourceEntry {
            path: base.to_path_buf(),
        });
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(base).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| ModError::io("walk", base)(io::Error::from(e)))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if leaves_only && has_subdirectory(entry.path())? {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(base) {
            found.push(rel.to_string_lossy().into_owned());
        }
    }
    found.sort();
    Ok(found)
}

fn has_subdirectory(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir).map_err(ModError::io("read directory", dir))? {
        if entry.map_err(ModError::io("read directory", dir))?.path().is_dir() {
            return Ok(true);
        }
    }
    Ok(false)
}
