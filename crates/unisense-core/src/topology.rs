// ── Topology view ──
//
// Per-device uplink, downlink, LLDP and active-port data, used to check
// whether the controller reports enough to map devices onto switch ports.
// Devices keep the order the controller returned them in.

use serde::Serialize;
use serde_json::Value;

use unisense_api::{DownlinkEntry, LegacyDevice, LldpEntry, PortEntry, Uplink};

#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub devices: Vec<DeviceTopology>,
}

impl TopologyReport {
    pub fn from_devices(devices: &[LegacyDevice]) -> Self {
        Self {
            devices: devices.iter().map(DeviceTopology::from).collect(),
        }
    }

    /// Devices that report an uplink MAC and remote port.
    pub fn mapped_uplinks(&self) -> usize {
        self.devices
            .iter()
            .filter(|d| {
                d.uplink
                    .as_ref()
                    .is_some_and(|u| u.uplink_mac.is_some() && u.uplink_remote_port.is_some())
            })
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceTopology {
    pub name: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub ip: String,
    /// `None` when the controller sent no uplink or an empty object.
    pub uplink: Option<UplinkSummary>,
    pub downlink_table: Vec<DownlinkEntry>,
    pub lldp_table: Vec<LldpEntry>,
    pub port_count: usize,
    /// Only ports that are up.
    pub active_ports: Vec<ActivePort>,
}

impl From<&LegacyDevice> for DeviceTopology {
    fn from(device: &LegacyDevice) -> Self {
        Self {
            name: device.display_name().to_owned(),
            mac: device.mac.clone().unwrap_or_default(),
            device_type: device
                .device_type
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            ip: device.ip.clone().unwrap_or_else(|| "N/A".into()),
            uplink: device
                .uplink
                .as_ref()
                .filter(|u| !u.is_empty())
                .map(UplinkSummary::from),
            downlink_table: device.downlink_table.clone(),
            lldp_table: device.lldp_table.clone(),
            port_count: device.port_table.len(),
            active_ports: device
                .port_table
                .iter()
                .filter(|p| p.up.unwrap_or(false))
                .map(ActivePort::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UplinkSummary {
    pub uplink_mac: Option<String>,
    pub uplink_remote_port: Option<i64>,
    pub uplink_device_name: Option<String>,
    pub mac: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
    /// The uplink object as sent, absent keys omitted.
    pub raw: Value,
}

impl From<&Uplink> for UplinkSummary {
    fn from(uplink: &Uplink) -> Self {
        Self {
            uplink_mac: uplink.uplink_mac.clone(),
            uplink_remote_port: uplink.uplink_remote_port,
            uplink_device_name: uplink.uplink_device_name.clone(),
            mac: uplink.mac.clone(),
            link_type: uplink.link_type.clone(),
            raw: without_nulls(serde_json::to_value(uplink).unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivePort {
    pub port_idx: Option<i64>,
    pub is_uplink: bool,
    pub mac_table: Vec<Value>,
    pub lldp_info: Option<Value>,
    /// Non-empty `mac`, `lldp_remote_mac` and `port_mac` values, in that order.
    pub addresses: Vec<PortAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortAddress {
    pub field: &'static str,
    pub value: String,
}

impl From<&PortEntry> for ActivePort {
    fn from(port: &PortEntry) -> Self {
        let addresses = [
            ("mac", &port.mac),
            ("lldp_remote_mac", &port.lldp_remote_mac),
            ("port_mac", &port.port_mac),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| PortAddress {
                    field,
                    value: v.to_owned(),
                })
        })
        .collect();

        Self {
            port_idx: port.port_idx,
            is_uplink: port.is_uplink.unwrap_or(false),
            mac_table: port.mac_table.clone(),
            lldp_info: port.lldp_info.clone().filter(is_present),
            addresses,
        }
    }
}

/// `{}`, `[]`, `""` and `null` count as nothing reported.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}
