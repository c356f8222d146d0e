// unisense-core: Sensor documents, topology and diagnostics on top of unisense-api.

pub mod config;
pub mod controller;
pub mod diagnose;
pub mod error;
pub mod sensor;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification, parse_host};
pub use controller::Controller;
pub use diagnose::{
    CheckResult, DiagnosticReport, DiagnosticTarget, Diagnostics, Section, SectionKind,
    SummaryEntry, TargetSummary,
};
pub use error::CoreError;
pub use sensor::{
    ClientReport, ClientSensor, DeviceKind, DeviceNames, DeviceReport, DeviceSensor,
    DeviceStatus,
};
pub use topology::{ActivePort, DeviceTopology, PortAddress, TopologyReport, UplinkSummary};

pub use unisense_api::{ControllerPlatform, LegacyClientEntry, LegacyDevice};
