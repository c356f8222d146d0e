// ── Controller facade ──
//
// One authenticated session against a UniFi controller, and the sensor
// documents built from it. Each command runs one linear pass:
// connect → fetch → reshape. Nothing is cached between calls.

use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use unisense_api::{ControllerPlatform, SessionClient};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::sensor::{ClientReport, DeviceNames, DeviceReport};
use crate::topology::TopologyReport;

struct Session {
    client: SessionClient,
    platform: ControllerPlatform,
}

/// Entry point for the sensors.
///
/// Does NOT connect on construction; call [`connect()`](Self::connect)
/// before fetching anything.
pub struct Controller {
    config: ControllerConfig,
    session: Option<Session>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// The login flavour that accepted the credentials, once connected.
    pub fn platform(&self) -> Option<ControllerPlatform> {
        self.session.as_ref().map(|s| s.platform)
    }

    // ── Connection ───────────────────────────────────────────────

    /// Authenticate against the UniFi OS endpoint, then once against the
    /// classic controller port.
    ///
    /// Empty credentials fail before any request is made.
    pub async fn connect(&mut self) -> Result<ControllerPlatform, CoreError> {
        let config = &self.config;
        if config.username.is_empty() || config.password.expose_secret().is_empty() {
            return Err(CoreError::MissingCredentials);
        }

        let client = SessionClient::new(
            config.url.clone(),
            config.fallback_url.clone(),
            config.site.clone(),
            &config.transport(),
        )?;
        let platform = client.login(&config.username, &config.password).await?;

        info!(
            platform = platform.label(),
            site = %config.site,
            "connected to controller"
        );
        self.session = Some(Session { client, platform });
        Ok(platform)
    }

    fn client(&self) -> Result<&SessionClient, CoreError> {
        self.session
            .as_ref()
            .map(|s| &s.client)
            .ok_or(CoreError::ControllerDisconnected)
    }

    // ── Sensors ──────────────────────────────────────────────────

    /// MAC → display name for every device. A failed fetch yields an
    /// empty map.
    pub async fn device_names(&self) -> Result<DeviceNames, CoreError> {
        match self.client()?.list_devices().await {
            Ok(devices) => Ok(DeviceNames::from_devices(&devices)),
            Err(e) => {
                warn!(error = %e, "device lookup failed, switch names will be unknown");
                Ok(DeviceNames::default())
            }
        }
    }

    /// The client sensor. A failed client fetch yields an empty report.
    pub async fn clients_report(&self) -> Result<ClientReport, CoreError> {
        let names = self.device_names().await?;

        let clients = match self.client()?.list_clients().await {
            Ok(clients) => clients,
            Err(e) => {
                warn!(error = %e, "client fetch failed, reporting no clients");
                Vec::new()
            }
        };

        debug!(
            clients = clients.len(),
            devices = names.len(),
            "fetched client data"
        );
        Ok(ClientReport::from_clients(&clients, &names))
    }

    /// The device sensor. A failed fetch yields an empty report.
    pub async fn devices_report(&self) -> Result<DeviceReport, CoreError> {
        let devices = match self.client()?.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "device fetch failed, reporting no devices");
                Vec::new()
            }
        };

        debug!(devices = devices.len(), "fetched device data");
        Ok(DeviceReport::from_devices(&devices))
    }

    /// Uplink, downlink, LLDP and active-port data per device.
    ///
    /// Unlike the sensors this does not degrade: a failed fetch is an error.
    pub async fn topology(&self) -> Result<TopologyReport, CoreError> {
        let devices = self.client()?.list_devices().await?;
        debug!(devices = devices.len(), "fetched topology data");
        Ok(TopologyReport::from_devices(&devices))
    }
}
