// Sensor documents: vendor records reshaped for command-line sensors.

pub mod clients;
pub mod devices;

pub use clients::{ClientReport, ClientSensor, UNKNOWN_SWITCH, format_client};
pub use devices::{
    DeviceKind, DeviceNames, DeviceReport, DeviceSensor, DeviceStatus, format_device,
    infer_device_kind, map_device_status,
};
