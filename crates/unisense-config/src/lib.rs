//! Configuration for the unisense sensors.
//!
//! Layers, lowest to highest: built-in defaults, an optional TOML file,
//! then values the binary collected from flags and `UNIFI_*` environment
//! variables. The result is translated into `unisense_core::ControllerConfig`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use unisense_core::{ControllerConfig, DiagnosticTarget, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File / default layer ────────────────────────────────────────────

/// Shape of the TOML file, and of the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub site: String,
    /// `true`, or any string equal to `"true"` ignoring case. Everything
    /// else, including `"1"` and `"yes"`, is false.
    #[serde(deserialize_with = "truthy")]
    pub verify_ssl: bool,
    pub ca_cert: Option<PathBuf>,
    /// Overall HTTP timeout in seconds.
    pub timeout: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.1".into(),
            username: String::new(),
            password: String::new(),
            site: "default".into(),
            verify_ssl: false,
            ca_cert: None,
            timeout: 30,
        }
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Bool(bool),
        Text(String),
    }

    Ok(match BoolOrText::deserialize(deserializer)? {
        BoolOrText::Bool(b) => b,
        BoolOrText::Text(s) => is_truthy(&s),
    })
}

pub fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

// ── Override layer ──────────────────────────────────────────────────

/// Values from command-line flags or their environment variables.
/// `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Raw text, interpreted like the file value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "unisense", "unisense").map(|dirs| dirs.config_dir().join("config.toml"))
}

// ── Loaded configuration ────────────────────────────────────────────

/// Effective settings for one run.
#[derive(Clone)]
pub struct SensorConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub site: String,
    pub verify_ssl: bool,
    pub ca_cert: Option<PathBuf>,
    pub timeout: Duration,
}

impl fmt::Debug for SensorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("site", &self.site)
            .field("verify_ssl", &self.verify_ssl)
            .field("ca_cert", &self.ca_cert)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SensorConfig {
    /// Load from `explicit` (which must exist) or the default config path
    /// (which may not), then apply `overrides`.
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => config_path().filter(|p| p.exists()),
        };
        if let Some(ref path) = file {
            debug!(path = %path.display(), "loading config file");
        }
        Self::from_figment(&figment(file.as_deref(), overrides))
    }

    fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: FileConfig = figment.extract()?;

        if raw.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }
        if raw.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(Self {
            host: raw.host,
            username: raw.username,
            password: SecretString::from(raw.password),
            site: raw.site,
            verify_ssl: raw.verify_ssl,
            ca_cert: raw.ca_cert,
            timeout: Duration::from_secs(raw.timeout),
        })
    }

    /// Certificate handling: no verification unless `verify_ssl` is set;
    /// with it, a configured CA file or the system roots.
    pub fn tls(&self) -> TlsVerification {
        match (self.verify_ssl, &self.ca_cert) {
            (false, _) => TlsVerification::DangerAcceptInvalid,
            (true, Some(path)) => TlsVerification::CustomCa(path.clone()),
            (true, None) => TlsVerification::SystemDefaults,
        }
    }

    /// Connection settings for `unisense_core::Controller`. Empty
    /// credentials pass through; the controller rejects them at connect.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let mut config =
            ControllerConfig::for_host(&self.host, self.username.clone(), self.password.clone())
                .map_err(|e| ConfigError::Validation {
                    field: "host".into(),
                    reason: e.to_string(),
                })?;
        config.site.clone_from(&self.site);
        config.tls = self.tls();
        config.timeout = self.timeout;
        Ok(config)
    }

    pub fn diagnostic_target(&self) -> Result<DiagnosticTarget, ConfigError> {
        let config = self.controller_config()?;
        let mut target = DiagnosticTarget::from(&config);
        target.host.clone_from(&self.host);
        Ok(target)
    }
}

fn figment(file: Option<&Path>, overrides: &Overrides) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));
    if let Some(path) = file {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Serialized::defaults(overrides))
}
