// Legacy API HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction, envelope
// unwrapping, and the primary/fallback endpoint pair. Endpoint modules
// (auth, devices, clients) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{ControllerPlatform, Endpoint};
use crate::error::{Error, preview};
use crate::legacy::models::LegacyResponse;
use crate::transport::TransportConfig;

/// Per-request timeout for login calls.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-request timeout for data fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// UniFi OS wraps some errors as `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(serde::Deserialize)]
struct UnifiOsError {
    error: Option<UnifiOsErrorInner>,
}

#[derive(serde::Deserialize)]
struct UnifiOsErrorInner {
    code: u16,
    message: Option<String>,
}

/// Session-authenticated client for the controller's legacy API.
///
/// Holds two endpoints for the same controller: the UniFi OS endpoint
/// (`https://{host}`, tried first) and the classic controller endpoint
/// (`https://{host}:8443`, tried once when the first fails). Both share
/// one cookie jar, so a session obtained on either is sent to both.
pub struct SessionClient {
    http: reqwest::Client,
    primary: Endpoint,
    fallback: Endpoint,
    site: String,
}

impl SessionClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies).
    pub fn new(
        primary: Url,
        fallback: Url,
        site: String,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, primary, fallback, site))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, primary: Url, fallback: Url, site: String) -> Self {
        Self {
            http,
            primary: Endpoint::new(primary, ControllerPlatform::UnifiOs),
            fallback: Endpoint::new(fallback, ControllerPlatform::ClassicController),
            site,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The UniFi OS endpoint (tried first).
    pub fn primary(&self) -> &Endpoint {
        &self.primary
    }

    /// The classic controller endpoint (tried once after a primary failure).
    pub fn fallback(&self) -> &Endpoint {
        &self.fallback
    }

    /// The endpoint serving the given platform.
    pub fn endpoint(&self, platform: ControllerPlatform) -> &Endpoint {
        if self.primary.platform == platform {
            &self.primary
        } else {
            &self.fallback
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a site-scoped path on one endpoint and unwrap the envelope.
    pub(crate) async fn get_at<T: DeserializeOwned>(
        &self,
        platform: ControllerPlatform,
        path: &str,
    ) -> Result<Vec<T>, Error> {
        let url = self.endpoint(platform).site_url(&self.site, path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// GET a site-scoped path on the primary endpoint; on any failure,
    /// make exactly one attempt on the fallback endpoint.
    pub(crate) async fn get_with_fallback<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, Error> {
        match self.get_at(self.primary.platform, path).await {
            Ok(data) => Ok(data),
            Err(primary_err) => {
                warn!(path, error = %primary_err, "primary endpoint failed, trying legacy port");
                self.get_at(self.fallback.platform, path).await
            }
        }
    }

    /// GET the primary endpoint's root page, returning the status and body.
    ///
    /// Used by diagnostics to confirm something UniFi-shaped answers HTTPS.
    pub async fn fetch_root(&self) -> Result<(reqwest::StatusCode, String), Error> {
        let url = self.primary.base_url.clone();
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .timeout(LOGIN_TIMEOUT)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        Ok((status, body))
    }
}

/// Parse the `{ meta, data }` envelope, returning `data` on success
/// or an `Error::LegacyApi` if `meta.rc != "ok"`.
///
/// Also handles UniFi OS error responses that use a different shape:
/// `{"error": {"code": 403, "message": "..."}}` (returned with HTTP 200).
pub(crate) async fn parse_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Vec<T>, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "session expired or invalid credentials".into(),
        });
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::LegacyApi {
            message: "insufficient permissions (HTTP 403)".into(),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::LegacyApi {
            message: format!("HTTP {status}: {}", preview(&body)),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    decode_envelope(&body)
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, Error> {
    if let Ok(wrapper) = serde_json::from_str::<UnifiOsError>(body) {
        if let Some(err) = wrapper.error {
            let msg = err.message.unwrap_or_default();
            return Err(if err.code == 401 {
                Error::Authentication { message: msg }
            } else {
                Error::LegacyApi {
                    message: format!("UniFi OS error {}: {msg}", err.code),
                }
            });
        }
    }

    let envelope: LegacyResponse<Value> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })?;

    if let Some(meta) = envelope.meta.filter(|m| m.rc != "ok") {
        return Err(Error::LegacyApi {
            message: meta.msg.unwrap_or_else(|| format!("rc={}", meta.rc)),
        });
    }

    // Records decode one at a time; a malformed one is dropped, not the list.
    let total = envelope.data.len();
    let records: Vec<T> = envelope
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value(record) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = idx, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect();
    if records.len() < total {
        debug!(kept = records.len(), total, "decoded records");
    }
    Ok(records)
}
