//! CLI integration tests
//!
//! Each test drives the `modelkit` binary against its own database file.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const DB_VARS: [&str; 6] = [
    "DB_PROTOCOL",
    "DB_USER",
    "DB_PASS",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
];

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("modelkit.db")
}

fn run(temp_dir: &TempDir, db: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_modelkit"));
    cmd.current_dir(temp_dir.path())
        .env("RUST_LOG", "off")
        .arg("--db")
        .arg(db)
        .args(args);
    cmd.output().expect("Failed to execute CLI")
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_migrate_reports_applied_migrations() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let first = json_stdout(&run(&temp_dir, &db, &["migrate"]));
    let second = json_stdout(&run(&temp_dir, &db, &["migrate"]));

    assert_eq!(first["applied"][0], "001_create_simplemodel");
    assert_eq!(first, second);
}

#[test]
fn test_add_then_count_and_latest() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let added = json_stdout(&run(
        &temp_dir,
        &db,
        &["add", "--col-1", "foo", "--col-2", "bar", "--type", "SUPER", "--value", "2.5"],
    ));
    assert_eq!(added["id"], 1);
    assert_eq!(added["type"], "SUPER");
    assert!(added["created_at"].is_string());

    let count = json_stdout(&run(&temp_dir, &db, &["count", "--col-1", "foo"]));
    assert_eq!(count["count"], 1);

    let none = json_stdout(&run(&temp_dir, &db, &["count", "--col-2", "missing"]));
    assert_eq!(none["count"], 0);

    let latest = json_stdout(&run(&temp_dir, &db, &["latest", "--type", "SUPER"]));
    assert_eq!(latest["col_1"], "foo");

    let absent = json_stdout(&run(&temp_dir, &db, &["latest", "--type", "NORMAL"]));
    assert!(absent.is_null());
}

#[test]
fn test_duplicate_pair_fails_with_constraint_code() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);
    let args = ["add", "--col-1", "foo", "--col-2", "bar"];

    json_stdout(&run(&temp_dir, &db, &args));
    let output = run(&temp_dir, &db, &args);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_CONSTRAINT_VIOLATION"), "{}", stderr);
    assert!(stderr.contains("uq_simplemodel_col_1"), "{}", stderr);
}

#[test]
fn test_invalid_type_is_rejected_at_parse_time() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let output = run(&temp_dir, &db, &["add", "--type", "INVALID_TYPE"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a valid ModelType"), "{}", stderr);
}

#[test]
fn test_stats_groups_by_type() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    for (col_1, model_type, value) in [
        ("a", "NORMAL", "0"),
        ("b", "NORMAL", "5"),
        ("c", "SUPER", "5"),
        ("d", "SUPER", "10"),
    ] {
        json_stdout(&run(
            &temp_dir,
            &db,
            &["add", "--col-1", col_1, "--type", model_type, "--value", value],
        ));
    }

    let stats = json_stdout(&run(&temp_dir, &db, &["stats"]));

    assert_eq!(stats["overall"]["count"], 4);
    assert_eq!(stats["overall"]["sum"], 20.0);
    assert_eq!(stats["by_type"][0]["type"], "NORMAL");
    assert_eq!(stats["by_type"][0]["avg"], 2.5);
    assert_eq!(stats["by_type"][1]["type"], "SUPER");
    assert_eq!(stats["by_type"][1]["avg"], 7.5);
}

#[test]
fn test_missing_environment_configuration_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_modelkit"));
    cmd.current_dir(temp_dir.path()).env("RUST_LOG", "off");
    for var in DB_VARS {
        cmd.env_remove(var);
    }
    let output = cmd.arg("count").output().expect("Failed to execute CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_CONFIGURATION"), "{}", stderr);
}

#[test]
fn test_environment_configuration_selects_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_modelkit"));
    cmd.current_dir(temp_dir.path())
        .env("RUST_LOG", "off")
        .env("DB_USER", "modelkit")
        .env("DB_PASS", "secret")
        .env("DB_HOST", "localhost")
        .env("DB_PORT", "5432")
        .env("DB_NAME", &db)
        .env_remove("DB_PROTOCOL");
    let output = cmd.args(["add", "--col-1", "env"]).output().unwrap();
    json_stdout(&output);

    let count = json_stdout(&run(&temp_dir, &db, &["count", "--col-1", "env"]));
    assert_eq!(count["count"], 1);
}
