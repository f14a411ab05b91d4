//! Integration tests for the seedgraph CLI
//!
//! These tests run the binary against seed directories on disk, covering the
//! full cycle of: import → compile → mark-seeded → compile again.

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;


use assert_cmd::cargo;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use common::fixtures::{ModelSpec, SeedBuilder, pc_seed};

/// Helper function to create a seedgraph command isolated from user config
fn seedgraph_cmd(state: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("seedgraph"));
    cmd.env("XDG_CONFIG_HOME", state)
        .env("RUST_LOG", "warn")
        .env("NO_COLOR", "1")
        .arg("--state")
        .arg(state.join("state.json"))
        .arg("--assertion-db")
        .arg(state.join("assertions.json"));
    cmd
}

#[test]
fn test_version() {
    let state = TempDir::new().unwrap();
    seedgraph_cmd(state.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seedgraph v"));
}

#[test]
fn test_help() {
    let state = TempDir::new().unwrap();
    seedgraph_cmd(state.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("mark-seeded"));
}

#[test]
fn test_no_args_shows_hint() {
    let state = TempDir::new().unwrap();
    seedgraph_cmd(state.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("seedgraph --help"));
}

#[test]
fn test_compile_human_output() {
    let seed = pc_seed();
    let state = TempDir::new().unwrap();

    seedgraph_cmd(state.path())
        .arg("--seed-dir")
        .arg(seed.path())
        .arg("compile")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 fragment(s)"))
        .stdout(predicate::str::contains("hello-world"))
        .stdout(predicate::str::contains("[required]"));
}

#[test]
fn test_compile_json_output() {
    let seed = pc_seed();
    let state = TempDir::new().unwrap();

    let output = seedgraph_cmd(state.path())
        .arg("--json")
        .arg("--seed-dir")
        .arg(seed.path())
        .arg("compile")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let fragments = json["fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 8);
    assert_eq!(fragments[0]["op"], "install");
    assert_eq!(fragments[0]["package"], "core");
    assert_eq!(fragments[3]["op"], "configure");
    assert_eq!(fragments[7]["op"], "mark-seeded");
    assert_eq!(fragments[7]["waits_for"], serde_json::json!([6]));
}

#[test]
fn test_compile_error_reports_kind() {
    let seed = SeedBuilder::new().model(&ModelSpec::pc()).package("core").build();
    let state = TempDir::new().unwrap();

    seedgraph_cmd(state.path())
        .arg("--json")
        .arg("--seed-dir")
        .arg(seed.path())
        .arg("compile")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"kind\": \"MANIFEST\""))
        .stdout(predicate::str::contains("pc-kernel"));
}

#[test]
fn test_compile_error_human_goes_to_stderr() {
    let seed = SeedBuilder::new().without_trust_dir().build();
    let state = TempDir::new().unwrap();

    seedgraph_cmd(state.path())
        .arg("--seed-dir")
        .arg(seed.path())
        .arg("compile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory does not exist"));
}

#[test]
fn test_classic_flag_makes_seed_optional() {
    let seed = SeedBuilder::new().without_trust_dir().without_manifest().build();
    let state = TempDir::new().unwrap();

    seedgraph_cmd(state.path())
        .arg("--classic")
        .arg("--seed-dir")
        .arg(seed.path())
        .arg("compile")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 fragment(s)"))
        .stdout(predicate::str::contains("mark-seeded"));
}

#[test]
fn test_config_file_sets_build_mode() {
    let seed = SeedBuilder::new().without_trust_dir().without_manifest().build();
    let state = TempDir::new().unwrap();
    let config = state.path().join("custom.toml");
    std::fs::write(
        &config,
        format!("build_mode = \"classic\"\nseed_dir = {:?}\n", seed.path().display().to_string()),
    )
    .unwrap();

    seedgraph_cmd(state.path())
        .arg("--config")
        .arg(&config)
        .arg("import")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to import"));
}

#[test]
fn test_missing_config_file_fails() {
    let state = TempDir::new().unwrap();

    seedgraph_cmd(state.path())
        .arg("--config")
        .arg(state.path().join("absent.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}
