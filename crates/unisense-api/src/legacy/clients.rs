// Legacy API client (station) endpoints (read-only).

use tracing::debug;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::SessionClient;
use crate::legacy::models::LegacyClientEntry;

impl SessionClient {
    /// List all currently connected clients (stations), falling back to
    /// the legacy port once if the UniFi OS endpoint fails.
    ///
    /// `GET {prefix}/api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<LegacyClientEntry>, Error> {
        debug!("listing connected clients");
        self.get_with_fallback("stat/sta").await
    }

    /// List clients from one endpoint only.
    pub async fn list_clients_at(
        &self,
        platform: ControllerPlatform,
    ) -> Result<Vec<LegacyClientEntry>, Error> {
        self.get_at(platform, "stat/sta").await
    }
}
