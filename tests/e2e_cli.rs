//! CLI end-to-end tests
//!
//! Tests for the marquee command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the marquee binary
#[allow(deprecated)]
fn marquee_cmd() -> Command {
    let mut cmd = Command::cargo_bin("marquee").unwrap();
    cmd.env_remove("MARQUEE_API_URL")
        .env_remove("TMDB_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = marquee_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = marquee_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("marquee"))
        .stdout(predicate::str::contains("featured"))
        .stdout(predicate::str::contains("watch-later"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = marquee_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("marquee"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = marquee_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    fs::write(
        &config_path,
        r#"
[api]
base_url = "https://api.example.com/api"

[featured]
primary_pages = 2
"#,
    )
    .unwrap();

    let mut cmd = marquee_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("https://api.example.com/api"))
        .stdout(predicate::str::contains("2 own"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    fs::write(&config_path, "[featured]\nprimary_pages = 0\n").unwrap();

    let mut cmd = marquee_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("primary_pages"));
}

#[test]
fn test_cli_validate_missing_file() {
    let mut cmd = marquee_cmd();
    cmd.arg("validate")
        .arg("/nonexistent/marquee.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_cli_featured_requires_api_key() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    fs::write(&config_path, "[tmdb]\napi_key = \"\"\n").unwrap();

    let mut cmd = marquee_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("featured")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_KEY"));
}

#[test]
fn test_cli_rejects_unknown_kind() {
    let mut cmd = marquee_cmd();
    cmd.args(["featured", "--kind", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_request_rejects_bad_json_body() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    fs::write(
        &config_path,
        format!(
            "[session]\ntoken_file = \"{}\"\n",
            dir.path().join("session.json").display()
        ),
    )
    .unwrap();

    let mut cmd = marquee_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["request", "POST", "/favorites/add", "--body", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_cli_logout_without_session() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("marquee.toml");
    let token_file = dir.path().join("session.json");
    fs::write(&token_file, r#"{"accessToken":"stale","theme":"dark"}"#).unwrap();
    fs::write(
        &config_path,
        format!(
            "[api]\nbase_url = \"http://127.0.0.1:9/api\"\ntimeout_secs = 2\n\n[session]\ntoken_file = \"{}\"\n",
            token_file.display()
        ),
    )
    .unwrap();

    let mut cmd = marquee_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&token_file).unwrap()).unwrap();
    assert!(doc.get("accessToken").is_none());
    assert_eq!(doc["theme"], "dark");
}
