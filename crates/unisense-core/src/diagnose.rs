// ── Connection diagnostics ──
//
// Step-by-step checks for "Authentication failed": name resolution, TCP
// reachability, the HTTPS front page, and both login endpoints. Every
// check runs even when an earlier one failed; the report is informational.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::net::{TcpStream, lookup_host};
use tracing::debug;
use url::{Host, Url};

use unisense_api::{ControllerPlatform, SessionClient, TlsMode, TransportConfig};

use crate::config::ControllerConfig;
use crate::error::CoreError;

const PORT_TIMEOUT: Duration = Duration::from_secs(5);
const CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const PREVIEW_CHARS: usize = 200;
const DEVICE_SAMPLE: usize = 5;

/// What to diagnose. Credentials may be empty; that is reported, not rejected.
#[derive(Debug, Clone)]
pub struct DiagnosticTarget {
    pub host: String,
    pub url: Url,
    pub fallback_url: Url,
    pub username: String,
    pub password: SecretString,
    pub site: String,
}

impl From<&ControllerConfig> for DiagnosticTarget {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            host: config.url.host_str().unwrap_or_default().to_owned(),
            url: config.url.clone(),
            fallback_url: config.fallback_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            site: config.site.clone(),
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Dns,
    Port,
    Https,
    Authentication,
    TwoFactor,
}

impl SectionKind {
    /// Label in the summary; `None` for informational sections.
    pub fn summary_label(self) -> Option<&'static str> {
        match self {
            Self::Dns => Some("DNS/Network"),
            Self::Port => Some("Port Access"),
            Self::Https => Some("HTTPS"),
            Self::Authentication => Some("Authentication"),
            Self::TwoFactor => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            details: details.into(),
        }
    }

    fn fail(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            details: details.into(),
        }
    }
}

/// One numbered step. `passed` is the step's verdict, which is not always
/// the conjunction of its checks (a failed primary login followed by a
/// successful legacy login passes).
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub passed: bool,
    pub checks: Vec<CheckResult>,
    pub notes: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_owned(),
            passed: false,
            checks: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    fn note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    fn finish(mut self, passed: bool) -> Self {
        self.passed = passed;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub host: String,
    pub username: String,
    pub password: String,
    pub site: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    pub name: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub target: TargetSummary,
    pub sections: Vec<Section>,
    pub summary: Vec<SummaryEntry>,
    pub all_passed: bool,
    pub recommendations: Vec<String>,
}

impl DiagnosticReport {
    fn assemble(target: &DiagnosticTarget, sections: Vec<Section>) -> Self {
        let summary: Vec<SummaryEntry> = sections
            .iter()
            .filter_map(|s| {
                s.kind.summary_label().map(|name| SummaryEntry {
                    name,
                    passed: s.passed,
                })
            })
            .collect();
        let all_passed = summary.iter().all(|e| e.passed);
        let first_failure = sections
            .iter()
            .find(|s| s.kind.summary_label().is_some() && !s.passed)
            .map(|s| s.kind);

        Self {
            target: TargetSummary {
                host: target.host.clone(),
                username: if target.username.is_empty() {
                    "(not set)".into()
                } else {
                    target.username.clone()
                },
                password: mask(&target.password),
                site: target.site.clone(),
            },
            recommendations: recommendations(first_failure, &target.url),
            sections,
            summary,
            all_passed,
        }
    }
}

fn mask(password: &SecretString) -> String {
    let len = password.expose_secret().chars().count();
    if len == 0 {
        "(not set)".into()
    } else {
        "*".repeat(len)
    }
}

fn recommendations(first_failure: Option<SectionKind>, url: &Url) -> Vec<String> {
    let lines: &[&str] = match first_failure {
        None => &[
            "Run the sensor with -vv to see each request it makes",
            "Check that the sensor uses the same UNIFI_* values as this run",
            "Check the configured site name if the sensor returns empty lists",
        ],
        Some(SectionKind::Dns) => &[
            "Check that the IP address is correct",
            "Ensure the controller is on the same network as this host",
        ],
        Some(SectionKind::Port) => &[
            "A firewall may be blocking the HTTPS port",
            "Check that the controller is running and accessible",
        ],
        Some(SectionKind::Https) => &[
            "SSL certificate issue (verification is disabled for this check)",
            "The controller web interface may be down",
        ],
        Some(SectionKind::Authentication | SectionKind::TwoFactor) => &[
            "Username or password is incorrect",
            "User may not have admin privileges",
            "2FA may be enabled (not supported)",
        ],
    };

    let mut out: Vec<String> = lines.iter().map(|l| (*l).to_owned()).collect();
    if first_failure == Some(SectionKind::Authentication) {
        out.push(format!("Try logging into {url} in a browser first"));
    }
    out
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

// ── Runner ───────────────────────────────────────────────────────────

pub struct Diagnostics {
    target: DiagnosticTarget,
    session: SessionClient,
}

impl Diagnostics {
    /// Prepare a run. Certificate verification is always off here so a
    /// self-signed controller still gets past the HTTPS step.
    pub fn new(target: DiagnosticTarget) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: CHECK_TIMEOUT,
            cookie_jar: None,
        }
        .with_cookie_jar();
        let session = SessionClient::new(
            target.url.clone(),
            target.fallback_url.clone(),
            target.site.clone(),
            &transport,
        )?;
        Ok(Self { target, session })
    }

    pub async fn run(&self) -> DiagnosticReport {
        let sections = vec![
            self.check_dns().await,
            self.check_port().await,
            self.check_https().await,
            self.check_auth().await,
            two_factor_section(),
        ];
        DiagnosticReport::assemble(&self.target, sections)
    }

    fn port(&self) -> u16 {
        self.target.url.port_or_known_default().unwrap_or(443)
    }

    async fn check_dns(&self) -> Section {
        let mut section = Section::new(SectionKind::Dns, "DNS Resolution / Host Reachability");
        let name = "DNS/IP resolution";

        let Some(host) = connect_host(&self.target.url) else {
            section.check(CheckResult::fail(name, "Controller URL has no host"));
            return section.finish(false);
        };

        match lookup_host((host.as_str(), self.port())).await {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => {
                    section.check(CheckResult::pass(
                        name,
                        format!("Host resolves to: {}", addr.ip()),
                    ));
                    section.finish(true)
                }
                None => {
                    section.check(CheckResult::fail(name, "Host resolved to no addresses"));
                    section.finish(false)
                }
            },
            Err(e) => {
                section.check(CheckResult::fail(name, format!("Cannot resolve host: {e}")));
                section.finish(false)
            }
        }
    }

    async fn check_port(&self) -> Section {
        let port = self.port();
        let mut section = Section::new(
            SectionKind::Port,
            &format!("Network Connectivity (Port {port})"),
        );
        let name = format!("Port {port} (HTTPS)");

        let Some(host) = connect_host(&self.target.url) else {
            section.check(CheckResult::fail(name, "Controller URL has no host"));
            return section.finish(false);
        };

        let attempt = tokio::time::timeout(PORT_TIMEOUT, TcpStream::connect((host.as_str(), port)));
        let passed = match attempt.await {
            Ok(Ok(_stream)) => {
                section.check(CheckResult::pass(
                    name,
                    "Port is open and accepting connections",
                ));
                true
            }
            Ok(Err(e)) => {
                section.check(CheckResult::fail(name, format!("Connection failed: {e}")));
                false
            }
            Err(_) => {
                section.check(CheckResult::fail(
                    name,
                    format!("No answer within {}s", PORT_TIMEOUT.as_secs()),
                ));
                false
            }
        };
        section.finish(passed)
    }

    async fn check_https(&self) -> Section {
        let mut section = Section::new(SectionKind::Https, "HTTPS Connection");

        match self.session.fetch_root().await {
            Ok((status, body)) => {
                section.check(CheckResult::pass(
                    "HTTPS connection",
                    format!("Status code: {}", status.as_u16()),
                ));
                if body.contains("UniFi") || body.to_lowercase().contains("ubnt") {
                    section.check(CheckResult::pass(
                        "UniFi detection",
                        "Response appears to be from a UniFi device",
                    ));
                } else {
                    section.check(CheckResult::fail(
                        "UniFi detection",
                        "Response doesn't look like UniFi",
                    ));
                    section.note(format!("Response preview: {}...", preview(&body)));
                }
                section.finish(true)
            }
            Err(unisense_api::Error::Transport(e)) if e.is_timeout() => {
                section.check(CheckResult::fail("HTTPS connection", "Connection timed out"));
                section.finish(false)
            }
            Err(e) => {
                section.check(CheckResult::fail(
                    "HTTPS connection",
                    format!("Connection error: {e}"),
                ));
                section.finish(false)
            }
        }
    }

    async fn check_auth(&self) -> Section {
        let mut section = Section::new(SectionKind::Authentication, "Authentication Endpoint");
        let target = &self.target;

        if target.username.is_empty() || target.password.expose_secret().is_empty() {
            section.check(CheckResult::fail(
                "Credentials provided",
                "UNIFI_USERNAME or UNIFI_PASSWORD not set!",
            ));
            section.note("Set UNIFI_HOST, UNIFI_USERNAME and UNIFI_PASSWORD and re-run");
            return section.finish(false);
        }
        section.check(CheckResult::pass(
            "Credentials provided",
            format!("Username: {}", target.username),
        ));

        if let Some(verdict) = self.try_primary_login(&mut section).await {
            return section.finish(verdict);
        }
        if self.try_legacy_login(&mut section).await {
            return section.finish(true);
        }

        section.check(CheckResult::fail("Authentication", "Both endpoints failed"));
        section.finish(false)
    }

    /// `Some(verdict)` when the primary endpoint settled the question,
    /// `None` when the legacy endpoint should be tried.
    async fn try_primary_login(&self, section: &mut Section) -> Option<bool> {
        let name = "Primary auth (UniFi OS)";
        let platform = ControllerPlatform::UnifiOs;
        if let Ok(url) = self.session.endpoint(platform).login_url() {
            section.note(format!("Trying primary endpoint: {url}"));
        }

        let outcome = match self
            .session
            .login_at(platform, &self.target.username, &self.target.password)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                section.note(format!("Primary endpoint failed: {e}"));
                return None;
            }
        };
        section.note(format!("Response status: {}", outcome.status.as_u16()));

        match outcome.status.as_u16() {
            200 => {
                section.check(CheckResult::pass(name, "Authentication successful!"));
                self.sample_devices(section).await;
                Some(true)
            }
            401 => {
                section.check(CheckResult::fail(name, "Invalid username or password"));
                if let Some(json) = outcome.json() {
                    let pretty = serde_json::to_string_pretty(&json).unwrap_or_default();
                    section.note(format!("Error details: {pretty}"));
                }
                Some(false)
            }
            403 => {
                section.check(CheckResult::fail(
                    name,
                    "Access forbidden - check user permissions",
                ));
                Some(false)
            }
            other => {
                section.check(CheckResult::fail(name, format!("Unexpected status: {other}")));
                section.note(format!("Response: {}", preview(&outcome.body)));
                None
            }
        }
    }

    async fn sample_devices(&self, section: &mut Section) {
        match self
            .session
            .list_devices_at(ControllerPlatform::UnifiOs)
            .await
        {
            Ok(devices) => {
                section.check(CheckResult::pass(
                    "API access",
                    format!("Found {} UniFi devices", devices.len()),
                ));
                for device in devices.iter().take(DEVICE_SAMPLE) {
                    section.note(format!(
                        "- {} ({})",
                        device.display_name(),
                        device.device_type.as_deref().unwrap_or("?")
                    ));
                }
                if devices.len() > DEVICE_SAMPLE {
                    section.note(format!("... and {} more", devices.len() - DEVICE_SAMPLE));
                }
            }
            Err(e) => {
                debug!(error = %e, "device sample failed");
                section.check(CheckResult::fail("API access", e.detail()));
            }
        }
    }

    async fn try_legacy_login(&self, section: &mut Section) -> bool {
        let name = "Legacy auth (Controller)";
        let platform = ControllerPlatform::ClassicController;
        if let Ok(url) = self.session.endpoint(platform).login_url() {
            section.note(format!("Trying legacy endpoint: {url}"));
        }

        match self
            .session
            .login_at(platform, &self.target.username, &self.target.password)
            .await
        {
            Ok(outcome) => {
                section.note(format!("Response status: {}", outcome.status.as_u16()));
                if outcome.status.as_u16() == 200 {
                    section.check(CheckResult::pass(name, "Authentication successful!"));
                    true
                } else {
                    section.check(CheckResult::fail(
                        name,
                        format!("Status {}", outcome.status.as_u16()),
                    ));
                    false
                }
            }
            Err(e) => {
                section.note(format!("Legacy endpoint failed: {e}"));
                false
            }
        }
    }
}

fn two_factor_section() -> Section {
    let mut section = Section::new(SectionKind::TwoFactor, "Two-Factor Authentication Check");
    for line in [
        "Note: two-factor authentication is NOT supported.",
        "If 2FA is enabled on your UniFi account, either:",
        "  1. Create a local admin account WITHOUT 2FA, or",
        "  2. Disable 2FA on your main account for API access",
        "",
        "To create a local-only admin account:",
        "  1. Go to UniFi Console > Settings > Admins",
        "  2. Click 'Add Admin'",
        "  3. Choose 'Local Access Only'",
        "  4. Set username/password",
        "  5. Do NOT enable 2FA for this account",
        "  6. Use these credentials for the sensors",
    ] {
        section.note(line);
    }
    section.finish(true)
}

/// Host part of the URL as something `lookup_host`/`connect` accept
/// (IPv6 literals without brackets).
fn connect_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => Some(domain.to_owned()),
        Host::Ipv4(ip) => Some(ip.to_string()),
        Host::Ipv6(ip) => Some(ip.to_string()),
    }
}
