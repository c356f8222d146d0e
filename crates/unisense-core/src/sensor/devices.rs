// ── Device sensor ──
//
// Flattens `stat/device` records into the shape the device sensor prints,
// and builds the MAC → display name map the client sensor uses to label
// switch ports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use unisense_api::LegacyDevice;

/// Broad device class, from the legacy `type` field with a model-prefix fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Gateway,
    Switch,
    AccessPoint,
    Other,
}

/// Operational state decoded from the legacy integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Offline,
    Online,
    PendingAdoption,
    Upgrading,
    Provisioning,
    Unknown,
}

/// Infer the device class from the legacy `type` (`uap`, `usw`, `ugw`, `udm`)
/// and, for newer hardware, the model prefix.
pub fn infer_device_kind(device_type: Option<&str>, model: Option<&str>) -> DeviceKind {
    match device_type {
        Some("uap") => DeviceKind::AccessPoint,
        Some("usw") => DeviceKind::Switch,
        Some("ugw" | "udm" | "uxg") => DeviceKind::Gateway,
        _ => {
            let Some(model) = model else {
                return DeviceKind::Other;
            };
            let upper = model.to_uppercase();
            if ["UAP", "U6", "U7"].iter().any(|p| upper.starts_with(p)) {
                DeviceKind::AccessPoint
            } else if ["USW", "USL"].iter().any(|p| upper.starts_with(p)) {
                DeviceKind::Switch
            } else if ["UGW", "UDM", "UDR", "UXG", "UCG", "UCK"]
                .iter()
                .any(|p| upper.starts_with(p))
            {
                DeviceKind::Gateway
            } else {
                DeviceKind::Other
            }
        }
    }
}

/// Known codes: 0=offline, 1=online, 2=pending adoption, 4=upgrading, 5=provisioning.
pub fn map_device_status(code: i64) -> DeviceStatus {
    match code {
        0 => DeviceStatus::Offline,
        1 => DeviceStatus::Online,
        2 => DeviceStatus::PendingAdoption,
        4 => DeviceStatus::Upgrading,
        5 => DeviceStatus::Provisioning,
        _ => DeviceStatus::Unknown,
    }
}

// ── Name map ────────────────────────────────────────────────────────

/// MAC address → display name for every device the controller knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceNames(HashMap<String, String>);

impl DeviceNames {
    /// Devices without a MAC are skipped; a repeated MAC keeps the last name.
    pub fn from_devices(devices: &[LegacyDevice]) -> Self {
        Self(
            devices
                .iter()
                .filter_map(|d| {
                    d.mac
                        .as_ref()
                        .map(|mac| (mac.clone(), d.display_name().to_owned()))
                })
                .collect(),
        )
    }

    pub fn get(&self, mac: &str) -> Option<&str> {
        self.0.get(mac).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Sensor record ───────────────────────────────────────────────────

/// One device as printed by the device sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSensor {
    pub name: String,
    pub mac: String,
    pub model: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub kind: DeviceKind,
    pub ip: String,
    pub version: String,
    pub state: i64,
    pub status: DeviceStatus,
    pub online: bool,
    pub adopted: bool,
    pub uptime: i64,
    pub num_sta: i64,
    pub uplink_mac: String,
    pub uplink_remote_port: Option<i64>,
}

pub fn format_device(device: &LegacyDevice) -> DeviceSensor {
    let state = device.state.unwrap_or(0);
    let status = map_device_status(state);
    let uplink = device.uplink.as_ref();

    DeviceSensor {
        name: device.display_name().to_owned(),
        mac: device.mac.clone().unwrap_or_default(),
        model: device.model.clone().unwrap_or_default(),
        device_type: device.device_type.clone().unwrap_or_default(),
        kind: infer_device_kind(device.device_type.as_deref(), device.model.as_deref()),
        ip: device.ip.clone().unwrap_or_default(),
        version: device.version.clone().unwrap_or_default(),
        state,
        status,
        online: status == DeviceStatus::Online,
        adopted: device.adopted.unwrap_or(false),
        uptime: device.uptime.unwrap_or(0),
        num_sta: device.num_sta.unwrap_or(0),
        uplink_mac: uplink
            .and_then(|u| u.uplink_mac.clone())
            .unwrap_or_default(),
        uplink_remote_port: uplink.and_then(|u| u.uplink_remote_port),
    }
}

/// The device sensor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub devices: Vec<DeviceSensor>,
    pub total_count: usize,
    pub online_count: usize,
    pub offline_count: usize,
}

impl DeviceReport {
    /// Reshape, sort case-insensitively by name, and count.
    pub fn from_devices(raw: &[LegacyDevice]) -> Self {
        let mut devices: Vec<DeviceSensor> = raw.iter().map(format_device).collect();
        devices.sort_by_key(|d| d.name.to_lowercase());

        let online_count = devices.iter().filter(|d| d.online).count();
        Self {
            total_count: devices.len(),
            online_count,
            offline_count: devices.len() - online_count,
            devices,
        }
    }
}
