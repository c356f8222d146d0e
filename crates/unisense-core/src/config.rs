// ── Runtime connection configuration ──
//
// These types describe *how* to connect to a UniFi controller.
// They carry credential data and connection tuning, but never touch disk.
// The binary constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use unisense_api::{TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// UniFi OS base URL, tried first (e.g., `https://192.168.1.1`).
    pub url: Url,
    /// Classic controller base URL, tried once after a primary failure
    /// (e.g., `https://192.168.1.1:8443`).
    pub fallback_url: Url,
    pub username: String,
    pub password: SecretString,
    /// Site to operate on (defaults to "default").
    pub site: String,
    pub tls: TlsVerification,
    /// Overall request timeout; login and fetch calls apply tighter limits.
    pub timeout: Duration,
}

impl ControllerConfig {
    /// Build a config for `host`, deriving `https://{host}` and the same
    /// host on port 8443.
    ///
    /// `host` may also be a full URL (`https://unifi.lan`), which is used
    /// as-is for the primary endpoint.
    pub fn for_host(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, CoreError> {
        let url = parse_host(host)?;
        let fallback_url =
            unisense_api::classic_controller_url(&url).map_err(|e| CoreError::Config {
                message: format!("cannot derive legacy controller URL from {host}: {e}"),
            })?;
        Ok(Self {
            url,
            fallback_url,
            username: username.into(),
            password,
            site: "default".into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Transport settings for the session client, with a fresh cookie jar.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}

/// `192.168.1.1` → `https://192.168.1.1/`; full URLs pass through.
pub fn parse_host(host: &str) -> Result<Url, CoreError> {
    let host = host.trim();
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid controller host '{host}': {e}"),
    })
}
