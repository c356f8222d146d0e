// ── Core error types ──
//
// User-facing errors from unisense-core. The `From<unisense_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// Both login endpoints rejected the session; `message` is the
    /// primary endpoint's failure.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Missing UNIFI_USERNAME or UNIFI_PASSWORD environment variables")]
    MissingCredentials,

    #[error("Not connected to controller")]
    ControllerDisconnected,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<unisense_api::Error> for CoreError {
    fn from(err: unisense_api::Error) -> Self {
        use unisense_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::ConnectionFailed {
                    url: e.url().map(ToString::to_string).unwrap_or_default(),
                    reason: err.to_string(),
                }
            }
            ApiError::Transport(e) => CoreError::Api {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid controller URL: {e}"),
            },
            ApiError::Tls(message) => CoreError::Config { message },
            ApiError::LegacyApi { message } | ApiError::Deserialization { message, .. } => {
                CoreError::Api {
                    message,
                    status: None,
                }
            }
        }
    }
}
