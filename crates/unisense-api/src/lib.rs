// unisense-api: async client for the UniFi controller's legacy JSON API

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::{ControllerPlatform, Endpoint, classic_controller_url};
pub use error::Error;
pub use legacy::models::{
    DownlinkEntry, LegacyClientEntry, LegacyDevice, LldpEntry, PortEntry, Uplink,
};
pub use legacy::{LoginOutcome, SessionClient};
pub use transport::{TlsMode, TransportConfig};
