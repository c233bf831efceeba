//! Integration tests for the `coursely` CLI binary.
//!
//! Argument parsing, help output, completions and exit codes run without a
//! server. The session tests drive the binary against a wiremock API with
//! config and data directories isolated in a tempdir.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `coursely` binary with env isolation.
///
/// Clears all `COURSELY_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real session.
fn coursely_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("coursely");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("COURSELY_PROFILE")
        .env_remove("COURSELY_API_URL")
        .env_remove("COURSELY_OUTPUT")
        .env_remove("COURSELY_INSECURE")
        .env_remove("COURSELY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a prepared command off the async runtime and collect its output.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = coursely_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("courses")
                .and(predicate::str::contains("login"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coursely"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = coursely_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected error naming foobar:\n{text}");
}

#[test]
fn test_list_without_session_exits_with_auth_code() {
    let home = tempfile::tempdir().unwrap();
    let output = coursely_cmd(home.path())
        .args(["courses", "list", "--api-url", &unreachable_url()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("coursely login"), "Expected login hint:\n{text}");
}

#[test]
fn test_whoami_without_session() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .arg("whoami")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_unknown_level_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = coursely_cmd(home.path())
        .args(["courses", "create", "--title", "Rust", "--level", "expert"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Beginner"), "Expected catalog in error:\n{text}");
}

#[test]
fn test_delete_without_yes_refuses_when_not_interactive() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["courses", "delete", "c1"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_cover_and_remove_cover_conflict() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["courses", "update", "c1", "--cover-image", "a.png", "--remove-cover"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_profile_lists_none() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["config", "set-default", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prod"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["config", "set", "api_url", "https://api.example.com"])
        .assert()
        .success();

    coursely_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.default]")
                .and(predicate::str::contains("https://api.example.com")),
        );
}

#[test]
fn test_config_path_is_under_config_home() {
    let home = tempfile::tempdir().unwrap();
    coursely_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Session against a mock API ──────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_token_for_later_commands() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "user": { "name": "Ada", "email": "ada@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "c1", "title": "Rust 101", "level": "Beginner" },
            { "_id": "c2", "title": "Async Rust", "level": "Advanced" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = coursely_cmd(home.path());
    login
        .args(["login", "--email", "ada@example.com", "--password-stdin"])
        .args(["--api-url", &server.uri()])
        .write_stdin("hunter2\n");
    let output = run(login).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Logged in as Ada"));

    let mut list = coursely_cmd(home.path());
    list.args(["courses", "list", "-o", "plain", "--api-url", &server.uri()]);
    let output = run(list).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "c1\nc2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let mut login = coursely_cmd(home.path());
    login
        .args(["login", "-e", "ada@example.com", "--password-stdin"])
        .args(["--api-url", &server.uri()])
        .write_stdin("wrong\n");
    let output = run(login).await;
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid credentials"));

    let mut whoami = coursely_cmd(home.path());
    whoami.args(["whoami", "--api-url", &server.uri()]);
    assert_eq!(run(whoami).await.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_course_exits_with_not_found_code() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/courses/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Course not found" })),
        )
        .mount(&server)
        .await;

    let mut login = coursely_cmd(home.path());
    login
        .args(["login", "-e", "ada@example.com", "--password-stdin"])
        .args(["--api-url", &server.uri()])
        .write_stdin("pw\n");
    assert!(run(login).await.status.success());

    let mut get = coursely_cmd(home.path());
    get.args(["courses", "get", "nope", "--api-url", &server.uri()]);
    let output = run(get).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Course not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_and_delete_round_trip() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/c1"))
        .and(body_json(json!({ "title": "Rust 201", "level": "Intermediate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "c1", "title": "Rust 201", "level": "Intermediate"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/courses/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut login = coursely_cmd(home.path());
    login
        .args(["login", "-e", "ada@example.com", "--password-stdin"])
        .args(["--api-url", &server.uri()])
        .write_stdin("pw\n");
    assert!(run(login).await.status.success());

    let mut update = coursely_cmd(home.path());
    update.args([
        "courses",
        "update",
        "c1",
        "--title",
        "Rust 201",
        "--level",
        "intermediate",
        "-o",
        "json-compact",
        "--api-url",
        &server.uri(),
    ]);
    let output = run(update).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["id"], "c1");
    assert_eq!(body["level"], "Intermediate");

    let mut delete = coursely_cmd(home.path());
    delete.args(["courses", "rm", "c1", "--yes", "--api-url", &server.uri()]);
    let output = run(delete).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Course deleted: c1"));
}
