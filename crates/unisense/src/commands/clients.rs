//! Client sensor command.

use tabled::Tabled;

use unisense_core::{ClientReport, ClientSensor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

impl From<&ClientSensor> for ClientRow {
    fn from(c: &ClientSensor) -> Self {
        let connection = if c.is_wired {
            format!(
                "{} port {}",
                c.sw_name,
                output::or_dash(Some(&c.sw_port).filter(|p| !p.is_null()))
            )
        } else if c.essid.is_empty() {
            "wireless".into()
        } else {
            format!("wifi {}", c.essid)
        };
        Self {
            hostname: c.hostname.clone(),
            ip: c.ip.clone(),
            mac: c.mac.clone(),
            network: c.network.clone(),
            connection,
            signal: if c.is_wired {
                String::new()
            } else {
                format!("{} dBm", c.signal)
            },
        }
    }
}

fn rows(report: &ClientReport) -> Vec<ClientRow> {
    report.clients.iter().map(ClientRow::from).collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let report = match fetch(global).await {
        Ok(report) => report,
        Err(err) => return Err(super::report_failure(global, Some("clients"), err)),
    };

    let out = output::render_document(global.output, &report, rows)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn fetch(global: &GlobalOpts) -> Result<ClientReport, CliError> {
    let controller = super::connect(global).await?;
    Ok(controller.clients_report().await?)
}
