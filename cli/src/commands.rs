pub mod probe;

use std::time::Duration;

use clap::{ArgAction, Parser};
use fleetprobe_common::config::{Config, FieldPath, MalformedLinePolicy};

#[derive(Parser, Debug)]
#[command(name = "fleetprobe", version)]
#[command(about = "Reports one INFO field from every key-value instance in a fleet.")]
#[command(disable_help_flag = true)]
pub struct CommandLine {
    /// Hosts to probe, e.g. "10.0.0.1-3", "10.0.0.0/29" or "cache-a,cache-b"
    #[arg(short = 'h', long = "hosts", value_name = "EXPR")]
    pub hosts: String,

    /// Ports to probe on every host, e.g. "6379-6381" [default: 11379,11380,11381]
    #[arg(short = 'p', long = "ports", value_name = "EXPR")]
    pub ports: Option<String>,

    /// Per endpoint connect and read timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS", default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Number of endpoints probed at once
    #[arg(short = 'c', long, value_name = "N", default_value_t = 1)]
    pub concurrency: usize,

    /// Reply field to report
    #[arg(
        short = 'f',
        long,
        value_name = "SECTION.KEY",
        default_value = "Clients.connected_clients"
    )]
    pub field: FieldPath,

    /// Fail an endpoint whose reply contains a line without ':'
    #[arg(long)]
    pub strict: bool,

    /// Reduce log output (-q warnings only, -qq errors only)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the run configuration for the already expanded port list.
    pub fn to_config(&self, ports: Vec<u16>) -> Config {
        Config {
            ports,
            timeout: Duration::from_millis(self.timeout_ms),
            concurrency: self.concurrency,
            field: self.field.clone(),
            malformed_lines: if self.strict {
                MalformedLinePolicy::Fail
            } else {
                MalformedLinePolicy::Skip
            },
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
