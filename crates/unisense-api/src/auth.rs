use url::Url;

use crate::error::Error;

/// The platform type of the UniFi controller.
///
/// Determines URL prefixes and the login path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- port 443, `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for legacy API endpoints.
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// Short human label, used in logs and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::UnifiOs => "UniFi OS",
            Self::ClassicController => "Controller",
        }
    }
}

/// One reachable flavour of a controller: a base URL plus the platform
/// conventions that apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: Url,
    pub platform: ControllerPlatform,
}

impl Endpoint {
    pub fn new(base_url: Url, platform: ControllerPlatform) -> Self {
        Self { base_url, platform }
    }

    /// `{base}{login_path}`
    pub fn login_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(self.platform.login_path())?)
    }

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    pub fn site_url(&self, site: &str, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.platform.legacy_prefix();
        Ok(Url::parse(&format!("{base}{prefix}/api/s/{site}/{path}"))?)
    }
}

/// Derive the legacy controller URL (same host, port 8443) from the
/// UniFi OS base URL.
pub fn classic_controller_url(primary: &Url) -> Result<Url, Error> {
    let mut url = primary.clone();
    url.set_port(Some(8443))
        .map_err(|()| Error::InvalidUrl(url::ParseError::InvalidPort))?;
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unifi_os_site_url_uses_proxy_prefix() {
        let endpoint = Endpoint::new(
            Url::parse("https://192.168.1.1").unwrap(),
            ControllerPlatform::UnifiOs,
        );
        assert_eq!(
            endpoint.site_url("default", "stat/sta").unwrap().as_str(),
            "https://192.168.1.1/proxy/network/api/s/default/stat/sta"
        );
        assert_eq!(
            endpoint.login_url().unwrap().as_str(),
            "https://192.168.1.1/api/auth/login"
        );
    }

    #[test]
    fn classic_site_url_has_no_prefix() {
        let endpoint = Endpoint::new(
            Url::parse("https://192.168.1.1:8443/").unwrap(),
            ControllerPlatform::ClassicController,
        );
        assert_eq!(
            endpoint.site_url("lab", "stat/device").unwrap().as_str(),
            "https://192.168.1.1:8443/api/s/lab/stat/device"
        );
        assert_eq!(
            endpoint.login_url().unwrap().as_str(),
            "https://192.168.1.1:8443/api/login"
        );
    }

    #[test]
    fn classic_url_replaces_port() {
        let primary = Url::parse("https://unifi.lan").unwrap();
        assert_eq!(
            classic_controller_url(&primary).unwrap().as_str(),
            "https://unifi.lan:8443/"
        );

        let with_port = Url::parse("https://unifi.lan:4443").unwrap();
        assert_eq!(
            classic_controller_url(&with_port).unwrap().port(),
            Some(8443)
        );
    }
}
