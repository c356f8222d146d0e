// Legacy API authentication
//
// Cookie-based session login. The login endpoint sets a session cookie in
// the client's jar; subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::ControllerPlatform;
use crate::error::{Error, preview};
use crate::legacy::client::{LOGIN_TIMEOUT, SessionClient};

/// Raw result of one login attempt, before any interpretation.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub status: reqwest::StatusCode,
    pub body: String,
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The response body as JSON, if it parses.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl SessionClient {
    /// Authenticate with username/password, UniFi OS first.
    ///
    /// On any transport error or non-2xx status from `POST /api/auth/login`,
    /// exactly one attempt is made at `POST :8443/api/login`. Returns the
    /// platform that accepted the credentials. When both fail, the error
    /// carries the primary endpoint's failure; the legacy failure is logged.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<ControllerPlatform, Error> {
        let primary = self.primary().platform;
        let primary_err = match self.login_checked(primary, username, password).await {
            Ok(()) => return Ok(primary),
            Err(e) => e,
        };

        warn!(error = %primary_err, "UniFi OS login failed, trying legacy controller login");

        let fallback = self.fallback().platform;
        match self.login_checked(fallback, username, password).await {
            Ok(()) => Ok(fallback),
            Err(legacy_err) => {
                debug!(error = %legacy_err, "legacy controller login failed");
                Err(Error::Authentication {
                    message: primary_err.detail(),
                })
            }
        }
    }

    /// Single login attempt against one endpoint, reporting the raw status
    /// and body. Only transport failures are errors.
    pub async fn login_at(
        &self,
        platform: ControllerPlatform,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, Error> {
        let url = self.endpoint(platform).login_url()?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .timeout(LOGIN_TIMEOUT)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(LoginOutcome { status, body })
    }

    async fn login_checked(
        &self,
        platform: ControllerPlatform,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        let outcome = self.login_at(platform, username, password).await?;
        if !outcome.is_success() {
            return Err(Error::Authentication {
                message: format!(
                    "login failed (HTTP {}): {}",
                    outcome.status,
                    preview(&outcome.body)
                ),
            });
        }
        debug!(platform = platform.label(), "login successful");
        Ok(())
    }
}
