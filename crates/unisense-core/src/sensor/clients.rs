// ── Client sensor ──
//
// Flattens `stat/sta` records into the shape the client sensor prints.
// A field that is absent or `null` in the vendor record takes its default.
// Numeric fields pass through as the controller sent them.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use unisense_api::LegacyClientEntry;

use super::devices::DeviceNames;

/// Label for a `sw_mac` that matches no known device.
pub const UNKNOWN_SWITCH: &str = "Unknown Switch";

/// One client as printed by the client sensor. Field order is the output order.
///
/// Counters, timestamps and radio figures stay JSON values: firmware
/// versions disagree on integer vs float, and the sensor forwards them as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSensor {
    // Identity
    pub mac: String,
    pub hostname: String,
    pub name: String,
    pub oui: String,

    // Network
    pub ip: String,
    pub network: String,
    pub vlan: Value,

    // Switch port
    pub sw_port: Value,
    pub sw_mac: String,
    pub sw_name: String,
    pub sw_depth: Value,

    // Connection state
    pub is_wired: bool,
    pub is_guest: bool,
    pub uptime: Value,
    pub last_seen: Value,
    pub first_seen: Value,

    // Wireless
    pub essid: String,
    pub radio: String,
    pub signal: Value,
    pub channel: Value,
    pub ap_mac: String,

    // Traffic
    pub tx_bytes: Value,
    pub rx_bytes: Value,
    pub tx_packets: Value,
    pub rx_packets: Value,

    pub satisfaction: Value,
    pub noted: bool,
    pub usergroup_id: String,
}

/// The vendor value, or `default` when it is missing.
fn or_default(value: Option<&Value>, default: Value) -> Value {
    value.cloned().unwrap_or(default)
}

pub fn format_client(client: &LegacyClientEntry, names: &DeviceNames) -> ClientSensor {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: &Option<Value>, default: i64| or_default(v.as_ref(), json!(default));
    let sw_mac = text(&client.sw_mac);
    let sw_name = names.get(&sw_mac).unwrap_or(UNKNOWN_SWITCH).to_owned();

    ClientSensor {
        mac: text(&client.mac),
        hostname: client
            .hostname
            .clone()
            .or_else(|| client.name.clone())
            .unwrap_or_else(|| "Unknown".into()),
        name: client
            .name
            .clone()
            .or_else(|| client.hostname.clone())
            .unwrap_or_default(),
        oui: text(&client.oui),

        ip: text(&client.ip),
        network: text(&client.network),
        vlan: number(&client.vlan, 1),

        sw_port: or_default(client.sw_port.as_ref(), Value::Null),
        sw_mac,
        sw_name,
        sw_depth: or_default(client.sw_depth.as_ref(), Value::Null),

        is_wired: client.is_wired.unwrap_or(false),
        is_guest: client.is_guest.unwrap_or(false),
        uptime: number(&client.uptime, 0),
        last_seen: number(&client.last_seen, 0),
        first_seen: number(&client.first_seen, 0),

        essid: text(&client.essid),
        radio: text(&client.radio),
        signal: number(&client.signal, 0),
        channel: or_default(client.channel.as_ref(), Value::Null),
        ap_mac: text(&client.ap_mac),

        tx_bytes: number(&client.tx_bytes, 0),
        rx_bytes: number(&client.rx_bytes, 0),
        tx_packets: number(&client.tx_packets, 0),
        rx_packets: number(&client.rx_packets, 0),

        satisfaction: number(&client.satisfaction, 100),
        noted: client.noted.unwrap_or(false),
        usergroup_id: text(&client.usergroup_id),
    }
}

/// The client sensor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReport {
    pub clients: Vec<ClientSensor>,
    pub total_count: usize,
    pub wired_count: usize,
    pub wireless_count: usize,
}

impl ClientReport {
    /// Reshape every client, sort case-insensitively by hostname, and count.
    pub fn from_clients(raw: &[LegacyClientEntry], names: &DeviceNames) -> Self {
        let mut clients: Vec<ClientSensor> =
            raw.iter().map(|c| format_client(c, names)).collect();
        clients.sort_by_key(|c| c.hostname.to_lowercase());

        let wired_count = clients.iter().filter(|c| c.is_wired).count();
        Self {
            total_count: clients.len(),
            wired_count,
            wireless_count: clients.len() - wired_count,
            clients,
        }
    }
}
