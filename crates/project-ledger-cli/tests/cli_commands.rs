// crates/project-ledger-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the project-ledger binary.
// Purpose: Ensure commands resolve, persist, and report errors end to end.
// Dependencies: project-ledger-cli binary, tempfile
// ============================================================================
//! ## Overview
//! Runs the compiled binary against SQLite stores in temporary directories.
//! Every invocation clears `PROJECT_LEDGER_CONFIG` and `RUST_LOG` so the host
//! environment cannot leak in.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn project_ledger_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_project-ledger"))
}

/// Writes a config pointing at a store inside `root`.
fn write_config(root: &Path) -> PathBuf {
    let config_path = root.join("project-ledger.toml");
    let store_path = root.join("ledger.sqlite");
    let config = format!("[store]\ntype = \"sqlite\"\npath = \"{}\"\n", store_path.display());
    fs::write(&config_path, config).expect("write config");
    config_path
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(project_ledger_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("PROJECT_LEDGER_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run project-ledger")
}

fn run_with_config(root: &TempDir, args: &[&str]) -> Output {
    let config_path = write_config(root.path());
    let mut full = vec!["--config", config_path.to_str().expect("utf-8 path")];
    full.extend_from_slice(args);
    run_in(root.path(), &full)
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn resolve(root: &TempDir, source_id: &str, department: &str, link: Option<&str>) -> Output {
    let mut args = vec!["resolve", "--source-id", source_id, "--department", department];
    if let Some(target) = link {
        args.extend_from_slice(&["--link", target]);
    }
    args.extend_from_slice(&["--year", "2025"]);
    run_with_config(root, &args)
}

// ============================================================================
// SECTION: Resolve
// ============================================================================

/// Verifies generation, idempotent repeat, and sequence advance.
#[test]
fn cli_resolve_generates_and_repeats() {
    let root = tempfile::tempdir().expect("temp dir");

    let first = resolve(&root, "12345", "Navy", None);
    assert!(first.status.success(), "stderr: {}", stderr_of(&first));
    assert_eq!(stdout_of(&first), "NY25001");

    let repeat = resolve(&root, "12345", "Navy", None);
    assert!(repeat.status.success(), "stderr: {}", stderr_of(&repeat));
    assert_eq!(stdout_of(&repeat), "NY25001");

    let next = resolve(&root, "12346", "Navy", None);
    assert_eq!(stdout_of(&next), "NY25002");

    let other = resolve(&root, "12347", "Army", None);
    assert_eq!(stdout_of(&other), "AR25001");
}

/// Verifies a link target shares its number with a new record.
#[test]
fn cli_resolve_links_to_existing_project() {
    let root = tempfile::tempdir().expect("temp dir");
    assert_eq!(stdout_of(&resolve(&root, "999", "Navy", None)), "NY25001");

    let linked = resolve(&root, "12345", "Navy", Some("NY25001"));
    assert!(linked.status.success(), "stderr: {}", stderr_of(&linked));
    assert_eq!(stdout_of(&linked), "NY25001");

    let shown = run_with_config(&root, &["show", "--project-number", "NY25001"]);
    assert!(shown.status.success(), "stderr: {}", stderr_of(&shown));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&shown)).expect("json");
    assert_eq!(value["source_record_ids"], serde_json::json!([999, 12_345]));
    assert_eq!(value["department"], "Navy");
    assert_eq!(value["partition_last_sequence"], 1);
}

/// Verifies an unknown link target falls through to generation.
#[test]
fn cli_resolve_missing_link_generates() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = resolve(&root, "5", "Navy", Some("NY25077"));
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "NY25001");
}

/// Verifies unmapped departments fail without output.
#[test]
fn cli_resolve_rejects_unmapped_department() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = resolve(&root, "1", "Space Force", None);
    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Failed to resolve project number"), "stderr: {stderr}");
    assert!(stderr.contains("Space Force"), "stderr: {stderr}");
}

/// Verifies malformed source ids are rejected.
#[test]
fn cli_resolve_rejects_malformed_source_id() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = resolve(&root, "12a", "Navy", None);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to resolve project number"));

    let output = resolve(&root, "9223372036854775808", "Navy", None);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("invalid source record id"), "stderr: {stderr}");
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
}

// ============================================================================
// SECTION: Show and Parse
// ============================================================================

/// Verifies show by source id and the not-found path.
#[test]
fn cli_show_by_source_id() {
    let root = tempfile::tempdir().expect("temp dir");
    assert_eq!(stdout_of(&resolve(&root, "77", "Air Force", None)), "AF25001");

    let shown = run_with_config(&root, &["show", "--source-id", "77"]);
    assert!(shown.status.success(), "stderr: {}", stderr_of(&shown));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&shown)).expect("json");
    assert_eq!(value["project_number"], "AF25001");
    assert_eq!(value["year"], 25);

    assert_eq!(stdout_of(&resolve(&root, "78", "Air Force", None)), "AF25002");
    let first = run_with_config(&root, &["show", "--project-number", "AF25001"]);
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&first)).expect("json");
    assert_eq!(value["sequence"], 1);
    assert_eq!(value["partition_last_sequence"], 2);

    let missing = run_with_config(&root, &["show", "--source-id", "79"]);
    assert!(!missing.status.success());
    assert!(stderr_of(&missing).contains("No project mapping for source record 79."));
}

/// Verifies parse prints the components of a valid number.
#[test]
fn cli_parse_valid_number() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = run_in(root.path(), &["parse", "AR26042"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).expect("json");
    assert_eq!(value["department_code"], "AR");
    assert_eq!(value["year"], 26);
    assert_eq!(value["sequence"], 42);
}

/// Verifies parse rejects malformed numbers.
#[test]
fn cli_parse_invalid_number() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = run_in(root.path(), &["parse", "ny25001"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Invalid project number ny25001"));
}

// ============================================================================
// SECTION: Config and Departments
// ============================================================================

/// Verifies departments prints the active table.
#[test]
fn cli_departments_lists_table() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = run_with_config(&root, &["departments"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).expect("json");
    assert_eq!(value["Navy"], "NY");
    assert_eq!(value["Army"], "AR");
}

/// Verifies config validate reports the source and store.
#[test]
fn cli_config_validate_reports_summary() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = run_with_config(&root, &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Config valid."), "stdout: {stdout}");
    assert!(stdout.contains("project-ledger.toml"), "stdout: {stdout}");
    assert!(stdout.contains("Store: sqlite at"), "stdout: {stdout}");
}

/// Verifies invalid config files fail closed.
#[test]
fn cli_config_validate_rejects_bad_config() {
    let root = tempfile::tempdir().expect("temp dir");
    let config_path = root.path().join("bad.toml");
    fs::write(&config_path, "[store]\ntype = \"memory\"\npath = \"x.sqlite\"\n")
        .expect("write config");
    let output = run_in(
        root.path(),
        &["--config", config_path.to_str().expect("utf-8 path"), "config", "validate"],
    );
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to load config"));
}

/// Verifies a missing default config falls back to built-in defaults.
#[test]
fn cli_uses_defaults_without_config_file() {
    let root = tempfile::tempdir().expect("temp dir");
    let output = run_in(root.path(), &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("built-in defaults"));

    let resolved = run_in(
        root.path(),
        &["resolve", "--source-id", "3", "--department", "Navy", "--year", "2031"],
    );
    assert!(resolved.status.success(), "stderr: {}", stderr_of(&resolved));
    assert_eq!(stdout_of(&resolved), "NY31001");
    assert!(root.path().join("project-ledger.sqlite").exists());
}
