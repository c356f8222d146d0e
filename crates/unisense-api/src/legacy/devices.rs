// Legacy API device endpoints (read-only).

use tracing::debug;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::SessionClient;
use crate::legacy::models::LegacyDevice;

impl SessionClient {
    /// List all devices with full statistics, falling back to the legacy
    /// port once if the UniFi OS endpoint fails.
    ///
    /// `GET {prefix}/api/s/{site}/stat/device`
    pub async fn list_devices(&self) -> Result<Vec<LegacyDevice>, Error> {
        debug!("listing devices");
        self.get_with_fallback("stat/device").await
    }

    /// List devices from one endpoint only.
    pub async fn list_devices_at(
        &self,
        platform: ControllerPlatform,
    ) -> Result<Vec<LegacyDevice>, Error> {
        self.get_at(platform, "stat/device").await
    }
}
