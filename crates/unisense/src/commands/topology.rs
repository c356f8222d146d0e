//! Topology dump: what the controller reports about uplinks and ports.

use std::fmt::Write as _;

use unisense_core::{
    ActivePort, ControllerPlatform, DeviceTopology, TopologyReport, UplinkSummary,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Palette, or_dash};

const RULE: &str =
    "================================================================================";

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (report, platform) = match fetch(global).await {
        Ok(fetched) => fetched,
        Err(err) => return Err(super::report_failure(global, None, err)),
    };

    let palette = Palette::new(global.color);
    let out = output::render_report(global.output, &report, |r| {
        render_text(r, platform, palette)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn fetch(global: &GlobalOpts) -> Result<(TopologyReport, &'static str), CliError> {
    let controller = super::connect(global).await?;
    let platform = controller.platform().map_or("controller", ControllerPlatform::label);
    Ok((controller.topology().await?, platform))
}

// ── Text report ─────────────────────────────────────────────────────

fn render_text(report: &TopologyReport, platform: &str, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({platform})\n", palette.pass("Login successful"));
    let _ = writeln!(out, "Found {} devices\n", report.devices.len());
    out.push_str(RULE);
    out.push('\n');

    for device in &report.devices {
        render_device(&mut out, device, palette);
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(
        out,
        "SUMMARY: {} of {} devices report uplink_mac and uplink_remote_port.",
        report.mapped_uplinks(),
        report.devices.len()
    );
    out.push_str("If they're empty, the controller isn't providing topology data;\n");
    out.push_str("map clients by their sw_mac/sw_port fields instead.\n");
    out.push_str(RULE);
    out
}

fn render_device(out: &mut String, device: &DeviceTopology, palette: Palette) {
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "DEVICE: {}", palette.heading(&device.name));
    let _ = writeln!(out, "  MAC: {}", device.mac);
    let _ = writeln!(out, "  Type: {}", device.device_type);
    let _ = writeln!(out, "  IP: {}", device.ip);

    out.push_str("\n  UPLINK OBJECT:\n");
    match &device.uplink {
        Some(uplink) => render_uplink(out, uplink),
        None => {
            let _ = writeln!(out, "    {}", palette.dim("(empty)"));
        }
    }

    let _ = writeln!(
        out,
        "\n  DOWNLINK_TABLE ({} entries):",
        device.downlink_table.len()
    );
    if device.downlink_table.is_empty() {
        let _ = writeln!(out, "    {}", palette.dim("(empty)"));
    }
    for dl in &device.downlink_table {
        let _ = writeln!(
            out,
            "    - MAC: {}, port_idx: {}, type: {}",
            or_dash(dl.mac.as_deref()),
            or_dash(dl.port_idx),
            or_dash(dl.link_type.as_deref())
        );
    }

    let _ = writeln!(out, "\n  LLDP_TABLE ({} entries):", device.lldp_table.len());
    if device.lldp_table.is_empty() {
        let _ = writeln!(out, "    {}", palette.dim("(empty)"));
    }
    for lldp in &device.lldp_table {
        let _ = writeln!(
            out,
            "    - Port {}: chassis_id={}, port_id={}",
            or_dash(lldp.local_port_idx),
            or_dash(lldp.chassis_id.as_deref()),
            or_dash(lldp.port_id.as_deref())
        );
    }

    if device.port_count > 0 {
        let _ = writeln!(out, "\n  PORT_TABLE ({} ports):", device.port_count);
        for port in &device.active_ports {
            render_port(out, port);
        }
    }
}

fn render_uplink(out: &mut String, uplink: &UplinkSummary) {
    let empty = |v: Option<String>| v.unwrap_or_else(|| "EMPTY".into());
    let _ = writeln!(out, "    uplink_mac: {}", empty(uplink.uplink_mac.clone()));
    let _ = writeln!(
        out,
        "    uplink_remote_port: {}",
        empty(uplink.uplink_remote_port.map(|p| p.to_string()))
    );
    let _ = writeln!(
        out,
        "    uplink_device_name: {}",
        empty(uplink.uplink_device_name.clone())
    );
    let _ = writeln!(out, "    mac: {}", empty(uplink.mac.clone()));
    let _ = writeln!(out, "    type: {}", empty(uplink.link_type.clone()));

    let raw = serde_json::to_string_pretty(&uplink.raw).unwrap_or_default();
    let _ = writeln!(out, "    Full uplink object: {}", indent(&raw, "      "));
}

fn render_port(out: &mut String, port: &ActivePort) {
    let _ = writeln!(
        out,
        "    Port {}: up=true, is_uplink={}",
        or_dash(port.port_idx),
        port.is_uplink
    );
    if !port.mac_table.is_empty() {
        let table = serde_json::to_string(&port.mac_table).unwrap_or_default();
        let _ = writeln!(out, "      mac_table: {table}");
    }
    if let Some(ref lldp) = port.lldp_info {
        let _ = writeln!(out, "      lldp_info: {lldp}");
    }
    for address in &port.addresses {
        let _ = writeln!(out, "      {}: {}", address.field, address.value);
    }
}

/// Indent every line after the first.
fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_owned()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
