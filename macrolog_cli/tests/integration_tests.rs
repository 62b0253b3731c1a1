//! Integration tests for the macrolog binary.
//!
//! These tests drive the interactive session over stdin and verify:
//! - Dashboard rendering and goal arithmetic
//! - Custom food logging, listing, and removal
//! - Water tracking
//! - Graceful gateway degradation when no API key is configured

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a command with a hermetic config and no API key
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("macrolog"));
    cmd.env_remove("OPENROUTER_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a config file into a temp dir and return (dir, path as String)
fn test_config() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[water]
quantum_ml = 250.0

[goals]
calories = 2500.0
protein_g = 180.0
carbs_g = 250.0
fat_g = 80.0
water_ml = 3000.0
"#,
    )
    .expect("Failed to write config");
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Daily nutrition ledger with AI food lookup",
        ));
}

#[test]
fn test_session_shows_dashboard_and_quits() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("TODAY"))
        .stdout(predicate::str::contains("2500"));
}

#[test]
fn test_custom_food_appears_in_list_and_totals() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("custom Oatmeal 300 10 55 5\nlist\ntoday\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Oatmeal"))
        .stdout(predicate::str::contains("300 kcal"))
        // 2500 goal - 300 consumed
        .stdout(predicate::str::contains("(2200 left)"));
}

#[test]
fn test_entries_listed_in_insertion_order() {
    let (_dir, config) = test_config();

    let output = cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("custom Eggs 150 12 1 10\ncustom Toast 180 6 30 3\nlist\nquit\n")
        .output()
        .expect("Failed to run macrolog");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let eggs = stdout.find("1. Eggs").expect("Eggs not listed first");
    let toast = stdout.find("2. Toast").expect("Toast not listed second");
    assert!(eggs < toast);
}

#[test]
fn test_remove_excludes_entry_from_totals() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("custom First 300\ncustom Second 450\nremove 1\ntoday\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed entry 1"))
        // only the 450 kcal entry remains against the 2500 goal
        .stdout(predicate::str::contains("(2050 left)"));
}

#[test]
fn test_remove_unknown_entry_is_harmless() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("remove 5\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry #5"));
}

#[test]
fn test_water_accumulates_by_quantum() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("water\nwater\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Water: 250 / 3000 ml"))
        .stdout(predicate::str::contains("Water: 500 / 3000 ml"));
}

#[test]
fn test_remaining_floors_at_zero_when_over_goal() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--goal-calories")
        .arg("2000")
        .write_stdin("custom Feast 2500\ntoday\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 left)"));
}

#[test]
fn test_search_without_api_key_renders_empty_state() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("log chicken breast\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No foods matched"));
}

#[test]
fn test_barcode_without_api_key_renders_not_found() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("scan 4006381333931\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not identify barcode"));
}

#[test]
fn test_advice_without_api_key_renders_try_again() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("advice\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Try again later"));
}

#[test]
fn test_configured_profile_drives_the_session() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profile]
name = "Alex"
weight_kg = 60.0
sex = "female"
goal_type = "gain_muscle"

[goals]
calories = 2200.0
"#,
    )
    .expect("Failed to write config");

    cli()
        .arg("--config")
        .arg(path.to_string_lossy().as_ref())
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex"))
        .stdout(predicate::str::contains("2200"));
}

#[test]
fn test_scan_with_multibyte_text_is_not_fatal() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("scan a€€\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not identify barcode"));
}

#[test]
fn test_unknown_command_is_not_fatal() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("frobnicate\ntoday\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command"));
}

#[test]
fn test_dismiss_without_advice() {
    let (_dir, config) = test_config();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("dismiss\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No advice to dismiss"));
}
