//! Clap derive structures for the `unisense` CLI.
//!
//! Defines the command tree, global flags, and shared types. Kept free of
//! crate-internal imports so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unisense -- UniFi controller sensors for home-automation command lines
#[derive(Debug, Parser)]
#[command(
    name = "unisense",
    version,
    about = "UniFi controller sensors for home-automation command lines",
    long_about = "Log in to a UniFi controller and print its clients or devices as a single\n\
        JSON document for command-line sensors.\n\n\
        Tries the UniFi OS endpoint first and the classic controller port (8443)\n\
        once if that fails.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller host or URL [default: 192.168.1.1]
    #[arg(long, short = 'H', env = "UNIFI_HOST", global = true)]
    pub host: Option<String>,

    /// Controller username
    #[arg(long, short = 'u', env = "UNIFI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, env = "UNIFI_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Site name [default: default]
    #[arg(long, short = 's', env = "UNIFI_SITE", global = true)]
    pub site: Option<String>,

    /// Verify the controller's TLS certificate ("true" enables, anything else disables)
    #[arg(
        long,
        env = "UNIFI_VERIFY_SSL",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub verify_ssl: Option<String>,

    /// PEM CA certificate used when verification is on
    #[arg(long, env = "UNIFI_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "UNIFI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Config file (TOML)
    #[arg(long, env = "UNIFI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIFI_OUTPUT",
        default_value = "json-compact",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact single-line JSON (default, for sensors)
    JsonCompact,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Pretty table or text report (interactive)
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Client sensor: connected clients with switch port names
    #[command(alias = "cl")]
    Clients,

    /// Device sensor: adopted devices with state and uplink
    #[command(alias = "dev")]
    Devices,

    /// Dump uplink, downlink, LLDP and active-port data per device
    Topology,

    /// Step-by-step connection and login diagnostics (always exits 0)
    Diagnose,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
