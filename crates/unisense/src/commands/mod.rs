//! Command dispatch and shared handler plumbing.

pub mod clients;
pub mod devices;
pub mod diagnose;
pub mod topology;

use serde::ser::{Serialize, SerializeMap, Serializer};

use unisense_core::Controller;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::{config, output};

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Clients => clients::handle(global).await,
        Command::Devices => devices::handle(global).await,
        Command::Topology => topology::handle(global).await,
        Command::Diagnose => diagnose::handle(global).await,
        Command::Completions(args) => {
            use clap::CommandFactory;

            let mut cmd = crate::cli::Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "unisense", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load configuration, log in, and hand back a connected controller.
pub async fn connect(global: &GlobalOpts) -> Result<Controller, CliError> {
    let sensor = config::load(global)?;
    let mut controller = Controller::new(sensor.controller_config()?);
    controller.connect().await?;
    Ok(controller)
}

// ── Failure document ────────────────────────────────────────────────

/// `{"error": "...", "<list>": []}`, with `error` first.
struct FailureDocument<'a> {
    error: String,
    list_key: Option<&'a str>,
}

impl Serialize for FailureDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("error", &self.error)?;
        if let Some(key) = self.list_key {
            map.serialize_entry(key, &Vec::<serde_json::Value>::new())?;
        }
        map.end()
    }
}

fn failure_document(err: &CliError, list_key: Option<&str>, format: OutputFormat) -> Option<String> {
    if format == OutputFormat::Table {
        return None;
    }
    let doc = FailureDocument {
        error: err.to_string(),
        list_key,
    };
    output::render_structured(format, &doc).ok()
}

/// Print the failure document a sensor consumer expects on stdout, then
/// pass the error on for the stderr diagnostic and exit code.
pub fn report_failure(global: &GlobalOpts, list_key: Option<&str>, err: CliError) -> CliError {
    if let Some(doc) = failure_document(&err, list_key, global.output) {
        output::print_output(&doc, false);
    }
    err
}
