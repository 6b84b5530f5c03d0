#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the subcommands, driven through parsed command
//! lines exactly as the binary dispatches them.

mod common;

use std::fs;

use common::{IntegrationTestContext, TestContextBuilder};
use modblur_cli::commands;
use modblur_cli::logging::Logger;
use modblur_cli::record::Record;

fn run(ctx: &IntegrationTestContext, args: &[&str]) -> anyhow::Result<()> {
    let cli = ctx.cli(args);
    let log = Logger::new(cli.command.name());
    commands::run(&cli, &log)
}

fn record(ctx: &IntegrationTestContext) -> Record {
    Record::load(&ctx.dest_path(".firefox-mod-blur.jsonc")).unwrap()
}

fn sample() -> IntegrationTestContext {
    TestContextBuilder::new()
        .with_mod("Tabs", "Round", &[("round.css", "r"), ("README.md", "Restart.")])
        .with_mod("Tabs", "Square", &[("square.css", "s")])
        .with_mod("Auto hide Mods", "Bookmarks", &[("bookmarks.css", "b")])
        .with_mod("Auto hide Mods", "Sidebar", &[("sidebar.css", "sb")])
        .with_theme("Dark/Blue", "blue.css")
        .with_theme("Light", "light.css")
        .build()
}

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

#[test]
fn install_creates_destination_and_record() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();

    assert!(ctx.dest_path("userChrome.css").is_file());
    assert!(ctx.dest_path("ASSETS/icons/tab.svg").is_file());
    assert!(record(&ctx).is_installed());
}

#[test]
fn reinstall_moves_previous_destination_aside() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    fs::write(ctx.dest_path("custom.css"), "mine").unwrap();

    run(&ctx, &["install", "--yes"]).unwrap();

    assert!(!ctx.dest_path("custom.css").exists());
    let backups: Vec<_> = fs::read_dir(ctx.profile.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("chrome.") && n.ends_with(".bak"))
        .collect();
    assert_eq!(backups.len(), 1, "{backups:?}");
    let backup = ctx.profile.path().join(&backups[0]);
    assert_eq!(fs::read_to_string(backup.join("custom.css")).unwrap(), "mine");
}

#[test]
fn exact_flag_installs_into_the_given_directory() {
    let ctx = sample();
    let target = ctx.profile.path().join("wrapped");
    let source = ctx.source.path().to_string_lossy().into_owned();
    let dest = target.to_string_lossy().into_owned();
    let cli = {
        use clap::Parser as _;
        modblur_cli::cli::Cli::try_parse_from([
            "modblur", "--exact", "--source", &source, &dest, "install", "--yes",
        ])
        .unwrap()
    };
    commands::run(&cli, &Logger::new("install")).unwrap();

    assert!(target.join("userChrome.css").is_file());
    assert!(!ctx.dest().exists());
}

// ---------------------------------------------------------------------------
// mods / theme
// ---------------------------------------------------------------------------

#[test]
fn commands_other_than_install_require_an_install() {
    let ctx = sample();
    for args in [
        &["mods", "Tabs", "Round"][..],
        &["theme", "Light"],
        &["update"],
        &["list"],
        &["uninstall", "--yes"],
    ] {
        let err = run(&ctx, args).unwrap_err();
        assert!(
            format!("{err:#}").contains("run the install command first"),
            "{args:?}: {err:#}"
        );
    }
}

#[test]
fn mods_sets_and_clears_a_category() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();

    run(&ctx, &["mods", "Tabs", "Round", "Square"]).unwrap();
    assert!(ctx.dest_path("round.css").is_file());
    assert!(ctx.dest_path("square.css").is_file());
    assert!(!ctx.dest_path("README.md").exists());

    run(&ctx, &["mods", "Tabs", "Square"]).unwrap();
    assert!(!ctx.dest_path("round.css").exists());
    assert_eq!(record(&ctx).get("Tabs").unwrap().len(), 1);

    run(&ctx, &["mods", "Tabs"]).unwrap();
    assert!(!record(&ctx).contains("Tabs"));
}

#[test]
fn mods_rejects_unknown_mod_without_changes() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    let before = record(&ctx);

    let err = run(&ctx, &["mods", "Tabs", "Ghost"]).unwrap_err();

    assert!(err.to_string().contains("unknown mod 'Ghost'"));
    assert_eq!(record(&ctx), before);
}

#[test]
fn single_choice_category_rejects_two_mods() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();

    let err = run(&ctx, &["mods", "Auto hide Mods", "Bookmarks", "Sidebar"]).unwrap_err();
    assert!(err.to_string().contains("only one mod"));

    run(&ctx, &["mods", "Auto hide Mods", "Sidebar"]).unwrap();
    run(&ctx, &["mods", "Auto hide Mods", "Bookmarks"]).unwrap();
    let mods = record(&ctx).get("Auto hide Mods").cloned().unwrap();
    assert_eq!(mods.keys().collect::<Vec<_>>(), vec!["Bookmarks"]);
    assert!(!ctx.dest_path("sidebar.css").exists());
}

#[test]
fn mods_refuses_the_theme_category() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    assert!(run(&ctx, &["mods", "theme", "Light"]).is_err());
}

#[test]
fn theme_swaps_and_clears() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();

    run(&ctx, &["theme", "Dark/Blue"]).unwrap();
    assert!(ctx.dest_path("blue.css").is_file());
    run(&ctx, &["theme", "Light"]).unwrap();
    assert!(!ctx.dest_path("blue.css").exists());
    assert!(ctx.dest_path("light.css").is_file());

    run(&ctx, &["theme"]).unwrap();
    assert!(!ctx.dest_path("light.css").exists());
    assert!(!record(&ctx).contains("theme"));
}

#[test]
fn theme_rejects_intermediate_directories() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    assert!(run(&ctx, &["theme", "Dark"]).is_err());
}

// ---------------------------------------------------------------------------
// update / list / available / uninstall
// ---------------------------------------------------------------------------

#[test]
fn update_pulls_source_changes() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    ctx.write_source("EXTRA MODS/Tabs/Round/round.css", "r2");
    ctx.write_source("userChrome.css", "/* chrome v2 */");

    run(&ctx, &["update"]).unwrap();

    assert_eq!(fs::read_to_string(ctx.dest_path("round.css")).unwrap(), "r2");
    assert_eq!(
        fs::read_to_string(ctx.dest_path("userChrome.css")).unwrap(),
        "/* chrome v2 */"
    );
}

#[test]
fn update_tolerates_vanished_mod_source() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    fs::remove_dir_all(ctx.source.path().join("EXTRA MODS/Tabs/Round")).unwrap();

    run(&ctx, &["update"]).unwrap();

    assert!(ctx.dest_path("round.css").is_file());
    assert!(record(&ctx).get("Tabs").unwrap().contains_key("Round"));
}

#[test]
fn mods_removes_installed_mods_after_category_vanished() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    fs::remove_dir_all(ctx.source.path().join("EXTRA MODS/Tabs")).unwrap();
    run(&ctx, &["update"]).unwrap();

    assert!(run(&ctx, &["mods", "Tabs", "Square"]).is_err());
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    assert!(ctx.dest_path("round.css").is_file());

    run(&ctx, &["mods", "Tabs"]).unwrap();

    assert!(!ctx.dest_path("round.css").exists());
    assert!(!record(&ctx).contains("Tabs"));
}

#[test]
fn theme_can_be_cleared_after_its_source_vanished() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["theme", "Light"]).unwrap();
    fs::remove_dir_all(ctx.source.path().join("EXTRA THEMES")).unwrap();

    run(&ctx, &["theme"]).unwrap();

    assert!(!ctx.dest_path("light.css").exists());
    assert!(!record(&ctx).contains("theme"));
}

#[test]
fn list_and_available_succeed() {
    let ctx = sample();
    run(&ctx, &["available"]).unwrap();
    run(&ctx, &["available", "Tabs"]).unwrap();
    run(&ctx, &["available", "theme"]).unwrap();
    assert!(run(&ctx, &["available", "Nope"]).is_err());

    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    run(&ctx, &["list"]).unwrap();
}

#[test]
fn uninstall_removes_destination() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();

    run(&ctx, &["uninstall", "--yes"]).unwrap();

    assert!(!ctx.dest().exists());
}

#[test]
fn corrupt_record_is_reported() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    fs::write(ctx.dest_path(".firefox-mod-blur.jsonc"), "// x\n[1, 2").unwrap();

    let err = run(&ctx, &["update"]).unwrap_err();
    assert!(format!("{err:#}").contains("is corrupt"));
}

#[test]
fn install_recovers_from_corrupt_record() {
    let ctx = sample();
    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();
    fs::write(ctx.dest_path(".firefox-mod-blur.jsonc"), "// x\n{").unwrap();

    run(&ctx, &["install", "--yes"]).unwrap();

    let fresh = record(&ctx);
    assert!(fresh.is_installed());
    assert!(!fresh.contains("Tabs"));
    run(&ctx, &["update"]).unwrap();
}

#[test]
fn layout_file_overrides_directory_names() {
    let ctx = TestContextBuilder::new()
        .with_layout("mods-dir = \"mods\"\n")
        .build();
    ctx.write_source("mods/Tabs/Round/round.css", "r");

    run(&ctx, &["install", "--yes"]).unwrap();
    run(&ctx, &["mods", "Tabs", "Round"]).unwrap();

    assert!(ctx.dest_path("round.css").is_file());
}
