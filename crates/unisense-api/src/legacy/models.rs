// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Every field is optional because the API
// is inconsistent about field presence and types across firmware versions.
// A `null` or a value of an unexpected type is treated as an absent key, so
// one odd field never rejects the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `None` for `null` and for values that don't fit `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// The type's default for `null` and for values that don't fit `T`
/// (arrays the API sometimes nulls or replaces with an object).
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
///
/// Some proxies strip `meta`; a missing `meta` counts as success.
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default, deserialize_with = "lenient")]
    pub msg: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`.
///
/// The legacy API returns 100+ fields per device. The ones the sensors and
/// the topology view read are modelled; everything else lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDevice {
    #[serde(rename = "_id", deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub device_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub ip: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub version: Option<String>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(deserialize_with = "lenient")]
    pub state: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub adopted: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub uptime: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub num_sta: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub uplink: Option<Uplink>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub downlink_table: Vec<DownlinkEntry>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub lldp_table: Vec<LldpEntry>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub port_table: Vec<PortEntry>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyDevice {
    /// `name`, else `model`, else `"Unknown"`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.model.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Uplink description nested in a device: which device/port it hangs off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Uplink {
    #[serde(deserialize_with = "lenient")]
    pub uplink_mac: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub uplink_remote_port: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub uplink_device_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub link_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Uplink {
    /// `true` when the controller sent `{}` (or only nulls).
    pub fn is_empty(&self) -> bool {
        self.uplink_mac.is_none()
            && self.uplink_remote_port.is_none()
            && self.uplink_device_name.is_none()
            && self.mac.is_none()
            && self.link_type.is_none()
            && self.extra.is_empty()
    }
}

/// Entry in a device's `downlink_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkEntry {
    #[serde(deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub port_idx: Option<i64>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub link_type: Option<String>,
}

/// Entry in a device's `lldp_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LldpEntry {
    #[serde(deserialize_with = "lenient")]
    pub local_port_idx: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub chassis_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub port_id: Option<String>,
}

/// Entry in a switch or gateway `port_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortEntry {
    #[serde(deserialize_with = "lenient")]
    pub port_idx: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub up: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub is_uplink: Option<bool>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub mac_table: Vec<Value>,
    pub lldp_info: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub lldp_remote_mac: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub port_mac: Option<String>,
}

// ── Client (Station) ─────────────────────────────────────────────────

/// Connected client from `stat/sta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyClientEntry {
    #[serde(rename = "_id", deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub mac: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub hostname: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub oui: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub ip: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub network: Option<String>,
    pub vlan: Option<Value>,
    pub sw_port: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub sw_mac: Option<String>,
    pub sw_depth: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub is_wired: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub is_guest: Option<bool>,
    pub uptime: Option<Value>,
    pub last_seen: Option<Value>,
    pub first_seen: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub essid: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub radio: Option<String>,
    pub signal: Option<Value>,
    pub channel: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub ap_mac: Option<String>,
    pub tx_bytes: Option<Value>,
    pub rx_bytes: Option<Value>,
    pub tx_packets: Option<Value>,
    pub rx_packets: Option<Value>,
    pub satisfaction: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub noted: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub usergroup_id: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
