//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::RequestArgs;

/// Command-line wrapper over the NITRO appliance API.
#[derive(Parser, Debug)]
#[command(name = "nitro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one request inside a login/logout session
    Request(RequestArgs),
}

/// Connection options, each of which may also come from the JSON config
/// file. An explicit flag always overrides the file value.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Path to a JSON config file whose keys match these flag names
    /// without the leading dashes
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Appliance URL, e.g. https://10.0.0.20
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Appliance username
    #[arg(long)]
    pub username: Option<String>,

    /// Appliance password
    #[arg(long)]
    pub password: Option<String>,

    /// API base path [default: /nitro/v1]
    #[arg(long, value_name = "PATH")]
    pub base_path: Option<String>,

    /// Verify the TLS certificate of an HTTPS endpoint [default: true]
    #[arg(long, value_name = "BOOL")]
    pub verify_ssl: Option<bool>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Mirror request/response traffic to the log file [default: true]
    #[arg(long, value_name = "BOOL")]
    pub logging: Option<bool>,

    /// Minimum severity written to the traffic log:
    /// CRITICAL | ERROR | WARNING | INFO | DEBUG | NOTSET [default: DEBUG]
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// The traffic log file to be used [default: logs/nitro.log]
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Truncate the traffic log at startup [default: true]
    #[arg(long, value_name = "BOOL")]
    pub clear_log: Option<bool>,
}
