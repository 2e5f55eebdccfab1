use std::time::Instant;

use anyhow::Context;
use fleetprobe_common::config::DEFAULT_PORTS;
use fleetprobe_common::network::range::{ExpandedRange, RangeExpander};
use fleetprobe_common::{info, success, warn};
use fleetprobe_core::network::tcp::InfoTransport;
use fleetprobe_core::probe::{self, RunSummary};

use crate::commands::CommandLine;
use crate::terminal::print::ConsoleSink;

/// Expands the host and port expressions and probes every endpoint.
///
/// Bad input or an unwritable output stream fails the run; endpoint failures
/// are reported and counted.
pub async fn probe(commands: CommandLine) -> anyhow::Result<RunSummary> {
    let hosts: ExpandedRange = commands
        .hosts
        .parse()
        .context("invalid hosts expression")?;

    let ports: Vec<u16> = match &commands.ports {
        Some(expr) => RangeExpander::expand_ports(expr).context("invalid ports expression")?,
        None => {
            info!("Using default ports: {:?}", DEFAULT_PORTS);
            DEFAULT_PORTS.to_vec()
        }
    };

    let cfg = commands.to_config(ports);
    cfg.validate()?;

    info!(
        "Probing {} host(s) on {} port(s) for {}",
        hosts.len(),
        cfg.ports.len(),
        cfg.field
    );

    let start_time = Instant::now();
    let mut sink = ConsoleSink::stdio();
    let summary = probe::run(&InfoTransport, &hosts, &cfg, &mut sink)
        .await
        .context("failed to write probe results")?;
    let elapsed = start_time.elapsed();

    if summary.failed == 0 {
        success!(
            "{} endpoint(s) answered in {:.2}s",
            summary.succeeded,
            elapsed.as_secs_f64()
        );
    } else {
        warn!(
            "{} of {} endpoint(s) failed in {:.2}s",
            summary.failed,
            summary.total(),
            elapsed.as_secs_f64()
        );
    }

    Ok(summary)
}
