#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` and `Diagnostics` against wiremock.
//
// Two mock servers stand in for the UniFi OS endpoint and the classic
// controller port.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unisense_core::{
    ControllerConfig, ControllerPlatform, Controller, CoreError, DiagnosticTarget, Diagnostics,
    SectionKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

const DEVICES: &str = "/proxy/network/api/s/default/stat/device";
const CLIENTS: &str = "/proxy/network/api/s/default/stat/sta";

struct Harness {
    primary: MockServer,
    legacy: MockServer,
}

impl Harness {
    async fn start() -> Self {
        Self {
            primary: MockServer::start().await,
            legacy: MockServer::start().await,
        }
    }

    fn config(&self, username: &str, password: &str) -> ControllerConfig {
        let mut config =
            ControllerConfig::for_host(&self.primary.uri(), username, password.to_string().into())
                .unwrap();
        config.fallback_url = Url::parse(&self.legacy.uri()).unwrap();
        config
    }

    fn controller(&self) -> Controller {
        Controller::new(self.config("admin", "hunter2"))
    }

    async fn accept_primary_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "TOKEN=abc; Path=/")
                    .set_body_json(json!({})),
            )
            .mount(&self.primary)
            .await;
    }
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

// ── Connection ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_without_credentials_makes_no_request() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.primary)
        .await;

    let mut controller = Controller::new(h.config("admin", ""));
    let err = controller.connect().await.unwrap_err();

    assert!(matches!(err, CoreError::MissingCredentials));
    assert_eq!(
        err.to_string(),
        "Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables"
    );
}

#[tokio::test]
async fn test_connect_falls_back_to_classic_controller() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&h.legacy)
        .await;

    let mut controller = h.controller();
    let platform = controller.connect().await.unwrap();

    assert_eq!(platform, ControllerPlatform::ClassicController);
    assert_eq!(controller.platform(), Some(ControllerPlatform::ClassicController));
}

#[tokio::test]
async fn test_connect_reports_primary_failure_when_both_reject() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&h.primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("legacy says no"))
        .mount(&h.legacy)
        .await;

    let mut controller = h.controller();
    let err = controller.connect().await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Authentication failed: "), "{message}");
    assert!(message.contains("bad credentials"), "{message}");
    assert!(!message.contains("legacy says no"), "{message}");
}

#[tokio::test]
async fn test_fetch_before_connect_is_rejected() {
    let h = Harness::start().await;
    let controller = h.controller();

    let err = controller.devices_report().await.unwrap_err();
    assert!(matches!(err, CoreError::ControllerDisconnected));
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_clients_report_labels_switch_ports() {
    let h = Harness::start().await;
    h.accept_primary_login().await;
    Mock::given(method("GET"))
        .and(path(DEVICES))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "mac": "f0:9f:c2:00:00:01", "name": "Rack Switch", "type": "usw", "state": 1 }
        ]))))
        .mount(&h.primary)
        .await;
    Mock::given(method("GET"))
        .and(path(CLIENTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "mac": "00:00:00:00:00:02", "hostname": "tv", "essid": "home" },
            {
                "mac": "00:00:00:00:00:01", "hostname": "NAS", "is_wired": true,
                "sw_mac": "f0:9f:c2:00:00:01", "sw_port": 4
            }
        ]))))
        .mount(&h.primary)
        .await;

    let mut controller = h.controller();
    controller.connect().await.unwrap();
    let report = controller.clients_report().await.unwrap();

    assert_eq!(report.total_count, 2);
    assert_eq!(report.wired_count, 1);
    assert_eq!(report.wireless_count, 1);
    assert_eq!(report.clients[0].hostname, "NAS");
    assert_eq!(report.clients[0].sw_name, "Rack Switch");
    assert_eq!(report.clients[0].sw_port, json!(4));
    assert_eq!(report.clients[1].sw_name, "Unknown Switch");
}

#[tokio::test]
async fn test_clients_report_keeps_records_with_odd_field_types() {
    let h = Harness::start().await;
    h.accept_primary_login().await;
    Mock::given(method("GET"))
        .and(path(DEVICES))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "mac": "f0:9f:c2:00:00:01", "name": "Rack Switch", "state": "1", "uptime": 3.5 }
        ]))))
        .mount(&h.primary)
        .await;
    Mock::given(method("GET"))
        .and(path(CLIENTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "hostname": "nas", "is_wired": true, "sw_mac": "f0:9f:c2:00:00:01" },
            { "hostname": "cam", "uptime": 12.5 }
        ]))))
        .mount(&h.primary)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(0)
        .mount(&h.legacy)
        .await;

    let mut controller = h.controller();
    controller.connect().await.unwrap();
    let report = controller.clients_report().await.unwrap();

    assert_eq!(report.total_count, 2);
    assert_eq!(report.clients[0].hostname, "cam");
    assert_eq!(report.clients[0].uptime, json!(12.5));
    assert_eq!(report.clients[1].hostname, "nas");
    assert_eq!(report.clients[1].sw_name, "Rack Switch");
}

#[tokio::test]
async fn test_clients_report_degrades_when_both_endpoints_fail() {
    let h = Harness::start().await;
    h.accept_primary_login().await;
    for server in [&h.primary, &h.legacy] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }

    let mut controller = h.controller();
    controller.connect().await.unwrap();
    let report = controller.clients_report().await.unwrap();

    assert!(report.clients.is_empty());
    assert_eq!(report.total_count, 0);
    assert_eq!(report.wired_count, 0);
    assert_eq!(report.wireless_count, 0);
}

#[tokio::test]
async fn test_devices_report_uses_legacy_data_on_primary_failure() {
    let h = Harness::start().await;
    h.accept_primary_login().await;
    Mock::given(method("GET"))
        .and(path(DEVICES))
        .respond_with(ResponseTemplate::new(502))
        .mount(&h.primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "mac": "aa:02", "name": "office ap", "type": "uap", "state": 1 },
            { "mac": "aa:01", "name": "Core GW", "type": "udm", "state": 0 }
        ]))))
        .expect(1)
        .mount(&h.legacy)
        .await;

    let mut controller = h.controller();
    controller.connect().await.unwrap();
    let report = controller.devices_report().await.unwrap();

    let names: Vec<&str> = report.devices.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Core GW", "office ap"]);
    assert_eq!(report.online_count, 1);
    assert_eq!(report.offline_count, 1);
}

#[tokio::test]
async fn test_topology_fails_when_both_endpoints_fail() {
    let h = Harness::start().await;
    h.accept_primary_login().await;
    for server in [&h.primary, &h.legacy] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(server)
            .await;
    }

    let mut controller = h.controller();
    controller.connect().await.unwrap();
    let err = controller.topology().await.unwrap_err();

    assert!(
        matches!(err, CoreError::Api { ref message, .. } if message.contains("insufficient permissions")),
        "{err:?}"
    );
}

// ── Diagnostics ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_diagnostics_all_checks_pass() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>UniFi OS</title>"))
        .mount(&h.primary)
        .await;
    h.accept_primary_login().await;
    let devices: Vec<serde_json::Value> = (0..7)
        .map(|i| json!({ "mac": format!("aa:0{i}"), "name": format!("dev{i}"), "type": "usw" }))
        .collect();
    Mock::given(method("GET"))
        .and(path(DEVICES))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(devices))))
        .mount(&h.primary)
        .await;

    let target = DiagnosticTarget::from(&h.config("admin", "hunter2"));
    let report = Diagnostics::new(target).unwrap().run().await;

    assert!(report.all_passed, "{report:#?}");
    assert_eq!(report.summary.len(), 4);
    assert_eq!(report.target.password, "*******");

    let auth = report
        .sections
        .iter()
        .find(|s| s.kind == SectionKind::Authentication)
        .unwrap();
    assert!(auth.checks.iter().any(|c| c.name == "API access" && c.details == "Found 7 UniFi devices"));
    assert!(auth.notes.iter().any(|n| n == "- dev0 (usw)"));
    assert!(auth.notes.iter().any(|n| n == "... and 2 more"));
}

#[tokio::test]
async fn test_diagnostics_stop_on_invalid_credentials() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "code": "AUTHENTICATION_FAILED" })),
        )
        .mount(&h.primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.legacy)
        .await;

    let target = DiagnosticTarget::from(&h.config("admin", "wrong"));
    let report = Diagnostics::new(target).unwrap().run().await;

    let auth = report
        .sections
        .iter()
        .find(|s| s.kind == SectionKind::Authentication)
        .unwrap();
    assert!(!auth.passed);
    assert!(auth.checks.iter().any(|c| c.details == "Invalid username or password"));
    assert!(auth.notes.iter().any(|n| n.starts_with("Error details:")));
    assert!(!report.all_passed);
}

#[tokio::test]
async fn test_diagnostics_legacy_login_rescues_unexpected_status() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&h.primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&h.legacy)
        .await;

    let target = DiagnosticTarget::from(&h.config("admin", "hunter2"));
    let report = Diagnostics::new(target).unwrap().run().await;

    let auth = report
        .sections
        .iter()
        .find(|s| s.kind == SectionKind::Authentication)
        .unwrap();
    assert!(auth.passed);
    assert!(auth.checks.iter().any(|c| c.details == "Unexpected status: 404"));
    assert!(auth.checks.iter().any(|c| c.name == "Legacy auth (Controller)" && c.passed));
}

#[tokio::test]
async fn test_diagnostics_without_credentials() {
    let h = Harness::start().await;
    let target = DiagnosticTarget::from(&h.config("", ""));
    let report = Diagnostics::new(target).unwrap().run().await;

    let auth = report
        .sections
        .iter()
        .find(|s| s.kind == SectionKind::Authentication)
        .unwrap();
    assert!(!auth.passed);
    assert_eq!(auth.checks[0].name, "Credentials provided");
    assert_eq!(report.target.username, "(not set)");
}
