//! CLI configuration: a thin wrapper around `unisense_config`.
//!
//! Flag and `UNIFI_*` environment values (clap resolves flag > env) become
//! the top configuration layer, above the TOML file and the defaults.

use unisense_config::{Overrides, SensorConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        host: global.host.clone(),
        username: global.username.clone(),
        password: global.password.clone(),
        site: global.site.clone(),
        verify_ssl: global.verify_ssl.clone(),
        ca_cert: global.ca_cert.clone(),
        timeout: global.timeout,
    }
}

/// Load the effective settings for this run.
pub fn load(global: &GlobalOpts) -> Result<SensorConfig, CliError> {
    let config = SensorConfig::load(global.config.as_deref(), &overrides(global))?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}
