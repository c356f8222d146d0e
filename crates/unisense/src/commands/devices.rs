//! Device sensor command.

use tabled::Tabled;

use unisense_core::{DeviceReport, DeviceSensor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Clients")]
    clients: i64,
    #[tabled(rename = "Uplink")]
    uplink: String,
}

impl From<&DeviceSensor> for DeviceRow {
    fn from(d: &DeviceSensor) -> Self {
        let uplink = match (d.uplink_mac.as_str(), d.uplink_remote_port) {
            ("", _) => String::new(),
            (mac, Some(port)) => format!("{mac} port {port}"),
            (mac, None) => mac.to_owned(),
        };
        Self {
            name: d.name.clone(),
            model: d.model.clone(),
            ip: d.ip.clone(),
            mac: d.mac.clone(),
            status: format!("{:?}", d.status),
            clients: d.num_sta,
            uplink,
        }
    }
}

fn rows(report: &DeviceReport) -> Vec<DeviceRow> {
    report.devices.iter().map(DeviceRow::from).collect()
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let report = match fetch(global).await {
        Ok(report) => report,
        Err(err) => return Err(super::report_failure(global, Some("devices"), err)),
    };

    let out = output::render_document(global.output, &report, rows)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn fetch(global: &GlobalOpts) -> Result<DeviceReport, CliError> {
    let controller = super::connect(global).await?;
    Ok(controller.devices_report().await?)
}
