//! Integration tests for the `unisense` CLI binary.
//!
//! Argument parsing, completions, and the failure documents sensors read
//! on stdout, plus one run against a mock controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `unisense` binary with env isolation.
///
/// Clears all `UNIFI_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn unisense_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unisense");
    cmd.env("HOME", "/tmp/unisense-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/unisense-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("UNIFI_HOST")
        .env_remove("UNIFI_USERNAME")
        .env_remove("UNIFI_PASSWORD")
        .env_remove("UNIFI_SITE")
        .env_remove("UNIFI_VERIFY_SSL")
        .env_remove("UNIFI_CA_CERT")
        .env_remove("UNIFI_TIMEOUT")
        .env_remove("UNIFI_CONFIG")
        .env_remove("UNIFI_OUTPUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = unisense_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    unisense_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("UniFi controller")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("topology"))
            .and(predicate::str::contains("diagnose")),
    );
}

#[test]
fn test_version_flag() {
    unisense_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unisense"));
}

#[test]
fn test_invalid_output_format() {
    let output = unisense_cmd()
        .args(["--output", "xml", "clients"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid value"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    unisense_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unisense"));
}

#[test]
fn test_completions_zsh() {
    unisense_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Failure documents ───────────────────────────────────────────────

#[test]
fn test_clients_without_credentials() {
    unisense_cmd()
        .arg("clients")
        .assert()
        .code(1)
        .stdout(
            "{\"error\":\"Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables\",\"clients\":[]}\n",
        )
        .stderr(predicate::str::contains("UNIFI_PASSWORD"));
}

#[test]
fn test_devices_without_password() {
    unisense_cmd()
        .args(["devices", "--username", "admin"])
        .assert()
        .code(1)
        .stdout(
            "{\"error\":\"Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables\",\"devices\":[]}\n",
        );
}

#[test]
fn test_table_mode_prints_no_failure_document() {
    unisense_cmd()
        .args(["--output", "table", "clients"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Missing UNIFI_USERNAME"));
}

#[test]
fn test_unreachable_controller_is_auth_failure() {
    let output = unisense_cmd()
        .args(["clients", "--host", "http://127.0.0.1:1", "--timeout", "2"])
        .env("UNIFI_USERNAME", "admin")
        .env("UNIFI_PASSWORD", "hunter2")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("{\"error\":\"Authentication failed: "),
        "unexpected stdout:\n{stdout}"
    );
    let doc: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(doc["clients"], json!([]));
}

#[test]
fn test_zero_timeout_is_usage_error() {
    let output = unisense_cmd()
        .args(["devices", "--timeout", "0"])
        .env("UNIFI_USERNAME", "admin")
        .env("UNIFI_PASSWORD", "hunter2")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("timeout"));
}

#[test]
fn test_missing_config_file() {
    unisense_cmd()
        .args(["clients", "--config", "/tmp/unisense-test-nonexistent/none.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_file_supplies_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unisense.toml");
    std::fs::write(
        &path,
        "host = \"http://127.0.0.1:1\"\nusername = \"admin\"\npassword = \"123456\"\ntimeout = 2\n",
    )
    .unwrap();

    // Credentials come from the file, so the failure is the login, not the precheck.
    let output = unisense_cmd()
        .arg("devices")
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(
        doc["error"]
            .as_str()
            .unwrap()
            .starts_with("Authentication failed: ")
    );
    assert_eq!(doc["devices"], json!([]));
}

#[test]
fn test_flag_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unisense.toml");
    std::fs::write(&path, "timeout = 30\n").unwrap();

    unisense_cmd()
        .args(["clients", "--timeout", "0"])
        .arg("--config")
        .arg(&path)
        .assert()
        .code(2);
}

// ── --verify-ssl[=BOOL] ─────────────────────────────────────────────
//
// The resolved settings are logged at debug level before the credential
// check, so `-vv` shows what reached the config layer.

const MISSING_CLIENTS_DOC: &str =
    "{\"error\":\"Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables\",\"clients\":[]}\n";

#[test]
fn test_bare_verify_ssl_before_subcommand_enables_verification() {
    unisense_cmd()
        .args(["-vv", "--verify-ssl", "clients"])
        .assert()
        .code(1)
        .stdout(MISSING_CLIENTS_DOC)
        .stderr(predicate::str::contains("verify_ssl: true"));
}

#[test]
fn test_verify_ssl_false_disables_verification() {
    unisense_cmd()
        .args(["-vv", "--verify-ssl=false", "clients"])
        .assert()
        .code(1)
        .stdout(MISSING_CLIENTS_DOC)
        .stderr(predicate::str::contains("verify_ssl: false"));
}

#[test]
fn test_verify_ssl_other_words_disable_verification() {
    unisense_cmd()
        .args(["-vv", "clients", "--verify-ssl=yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("verify_ssl: false"));
}

#[test]
fn test_verify_ssl_env_is_case_insensitive() {
    unisense_cmd()
        .args(["-vv", "clients"])
        .env("UNIFI_VERIFY_SSL", "TRUE")
        .assert()
        .code(1)
        .stdout(MISSING_CLIENTS_DOC)
        .stderr(predicate::str::contains("verify_ssl: true"));
}

#[test]
fn test_verify_ssl_defaults_off() {
    unisense_cmd()
        .args(["-vv", "clients"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("verify_ssl: false"));
}

#[test]
fn test_diagnose_without_credentials_still_exits_zero() {
    unisense_cmd()
        .args(["diagnose", "--host", "http://127.0.0.1:1", "--output", "table"])
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("UniFi Authentication Diagnostic Tool")
                .and(predicate::str::contains("Password:        (not set)"))
                .and(predicate::str::contains("Some tests failed")),
        );
}

// ── Against a mock controller ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_document_from_mock_controller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "TOKEN=abc; Path=/")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proxy/network/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "mac": "f0:9f:c2:00:00:01", "name": "Office Switch" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/proxy/network/api/s/default/stat/sta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [
                {
                    "mac": "aa:bb:cc:00:00:01", "hostname": "nas", "ip": "10.0.0.5",
                    "is_wired": true, "sw_mac": "f0:9f:c2:00:00:01", "sw_port": 4
                },
                { "mac": "aa:bb:cc:00:00:02", "name": "Phone", "essid": "home" }
            ]
        })))
        .mount(&server)
        .await;

    let host = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        unisense_cmd()
            .args(["clients", "--host", &host])
            .env("UNIFI_USERNAME", "admin")
            .env("UNIFI_PASSWORD", "hunter2")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["total_count"], 2);
    assert_eq!(doc["wired_count"], 1);
    assert_eq!(doc["wireless_count"], 1);
    assert_eq!(doc["clients"][0]["hostname"], "nas");
    assert_eq!(doc["clients"][0]["sw_name"], "Office Switch");
    assert_eq!(doc["clients"][1]["hostname"], "Phone");
}
