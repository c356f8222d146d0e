//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text. The `Display` text of each variant is also the
//! `error` field of a sensor's failure document.

use miette::Diagnostic;
use thiserror::Error;

use unisense_config::ConfigError;
use unisense_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Credentials / authentication ─────────────────────────────────

    #[error("Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables")]
    #[diagnostic(
        code(unisense::missing_credentials),
        help(
            "Set UNIFI_USERNAME and UNIFI_PASSWORD, pass --username/--password,\n\
             or add username/password to the config file."
        )
    )]
    MissingCredentials,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(unisense::auth_failed),
        help(
            "Both the UniFi OS and the classic controller login were rejected.\n\
             Accounts with two-factor authentication cannot log in; use a local-only admin.\n\
             Run: unisense diagnose"
        )
    )]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unisense::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             Run: unisense diagnose"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(
        code(unisense::api_error),
        help("Check the site name (--site / UNIFI_SITE) and the account's permissions.")
    )]
    ApiError { message: String },

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unisense::validation))]
    Validation { field: String, reason: String },

    #[error("Config file not found: {path}")]
    #[diagnostic(
        code(unisense::no_config),
        help("Check --config / UNIFI_CONFIG, or drop it to use flags and environment only.")
    )]
    MissingConfigFile { path: String },

    #[error(transparent)]
    #[diagnostic(code(unisense::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(unisense::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(unisense::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingCredentials => CliError::MissingCredentials,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "no session with the controller".into(),
            },

            CoreError::Api { message, status: _ } => CliError::ApiError { message },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::MissingFile { path } => CliError::MissingConfigFile {
                path: path.display().to_string(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
        }
    }
}
