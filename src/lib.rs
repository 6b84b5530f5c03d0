//! Installer for optional CSS mods layered onto a browser profile.
//!
//! A source tree offers essential stylesheets, an asset bundle, categorised
//! mods and themes. The installer copies a selection into the profile's
//! destination directory and keeps a record of every path it placed there,
//! so that mods can be swapped, updated and removed without touching the
//! operator's own files.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: source tree layout conventions, loaded from an optional TOML file
//! - **[`catalog`]**: read-only view of what the source tree offers
//! - **[`record`]**: the persisted record of what is installed
//! - **[`operations`]** and **[`tree_diff`]**: filesystem primitives and recursive sync
//! - **[`resources`]**: `check + apply` units (a mod's files, the backup guard)
//! - **[`reconcile`]**: selection, refresh and first install against the record
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod reconcile;
pub mod record;
pub mod resources;
pub mod tree_diff;
