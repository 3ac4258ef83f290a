//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// BLE proximity pet door controller.
#[derive(Debug, Parser)]
#[command(name = "petdoord", version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true, env = "PETDOOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the controller (default)
    Run,

    /// Write network credentials and the beacon name to the store
    Provision(ProvisionArgs),

    /// Print the stored credentials (secret masked)
    Show,

    /// Zero-fill the credential regions
    Erase,
}

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Wireless network name
    #[arg(long)]
    pub ssid: String,

    /// Wireless network passphrase (empty for an open network)
    #[arg(long, default_value = "")]
    pub password: String,

    /// Advertised name of the pet's beacon
    #[arg(long)]
    pub beacon: String,
}
