// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed source tree and browser profile with
// a fluent builder, so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use modblur_cli::catalog::Catalog;
use modblur_cli::cli::Cli;
use modblur_cli::config::Layout;
use modblur_cli::reconcile::Reconciler;

/// Write the minimal source tree the installer needs into `root`.
///
/// Creates:
/// - `userChrome.css`, `userContent.css`  essential stylesheets
/// - `ASSETS/icons/tab.svg`                 essential asset bundle
/// - `EXTRA MODS/`                          empty mods directory
/// - `EXTRA THEMES/`                        empty themes directory
pub fn setup_minimal_source(root: &Path) {
    write(root, "userChrome.css", "/* chrome */");
    write(root, "userContent.css", "/* content */");
    write(root, "ASSETS/icons/tab.svg", "<svg/>");
    fs::create_dir_all(root.join("EXTRA MODS")).expect("create mods dir");
    fs::create_dir_all(root.join("EXTRA THEMES")).expect("create themes dir");
}

/// Write `content` to `rel` below `root`, creating parents.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

/// Sorted relative paths below `root` paired with file contents
/// (`None` for directories).
pub fn tree(root: &Path) -> Vec<(String, Option<String>)> {
    let mut out: Vec<_> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("walk");
            let rel = entry
                .path()
                .strip_prefix(root)
                .expect("strip prefix")
                .to_string_lossy()
                .into_owned();
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read_to_string(entry.path()).expect("read"));
            (rel, content)
        })
        .collect();
    out.sort();
    out
}

/// An isolated source tree and profile directory.
///
/// Both directories are deleted when dropped.
pub struct IntegrationTestContext {
    /// Source tree root.
    pub source: tempfile::TempDir,
    /// Browser profile directory; the destination is `chrome/` inside it.
    pub profile: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal source tree and an empty profile.
    pub fn new() -> Self {
        let source = tempfile::tempdir().expect("create source dir");
        setup_minimal_source(source.path());
        Self {
            source,
            profile: tempfile::tempdir().expect("create profile dir"),
        }
    }

    /// Destination directory.
    pub fn dest(&self) -> PathBuf {
        self.profile.path().join("chrome")
    }

    /// Path of `rel` inside the destination.
    pub fn dest_path(&self, rel: &str) -> PathBuf {
        self.dest().join(rel)
    }

    /// Write `content` to `rel` in the source tree.
    pub fn write_source(&self, rel: &str, content: &str) {
        write(self.source.path(), rel, content);
    }

    /// Open a reconciler on the destination with the default layout.
    pub fn reconciler(&self) -> Reconciler {
        let catalog = Catalog::new(self.source.path().to_path_buf(), Layout::default());
        Reconciler::open(catalog, self.dest()).expect("open reconciler")
    }

    /// Parse a command line targeting this context, e.g. `["mods", "Tabs"]`.
    pub fn cli(&self, args: &[&str]) -> Cli {
        use clap::Parser as _;
        let source = self.source.path().to_string_lossy().into_owned();
        let profile = self.profile.path().to_string_lossy().into_owned();
        let mut argv = vec!["modblur", "--source", &source, &profile];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse command line")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to add mods, themes and a layout file before the
/// context is finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal source tree.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Add a mod with the given `(file name, content)` entries.
    pub fn with_mod(self, category: &str, name: &str, files: &[(&str, &str)]) -> Self {
        let dir = format!("EXTRA MODS/{category}/{name}");
        fs::create_dir_all(self.ctx.source.path().join(&dir)).expect("create mod dir");
        for (file, content) in files {
            self.ctx.write_source(&format!("{dir}/{file}"), content);
        }
        self
    }

    /// Add a theme with a single stylesheet.
    pub fn with_theme(self, name: &str, file: &str) -> Self {
        self.ctx
            .write_source(&format!("EXTRA THEMES/{name}/{file}"), "/* theme */");
        self
    }

    /// Write a `modblur.toml` layout override at the source root.
    pub fn with_layout(self, toml: &str) -> Self {
        self.ctx.write_source("modblur.toml", toml);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
