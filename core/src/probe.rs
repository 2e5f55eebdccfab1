//! Probe orchestration.
//!
//! Endpoints are the cross product of hosts and ports, hosts outer. They are
//! probed with at most `concurrency` requests in flight, and results are
//! delivered to the [`ReportSink`] in endpoint order whatever the concurrency.
//! A failing endpoint never affects its siblings.

use std::io;
use std::time::Duration;

use fleetprobe_common::config::{Config, FieldPath};
use fleetprobe_common::info::model::ParsedInfo;
use fleetprobe_common::info::parser::{InfoParser, ParseError};
use futures::stream::{self, Stream, StreamExt};
use thiserror::Error;
use tracing::debug;

use crate::network::transport::{Endpoint, Transport, TransportError};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("field {section}.{key} not found in reply")]
    MissingField { section: String, key: String },
}

/// Outcome of probing one endpoint: the parsed reply or the reason there is none.
#[derive(Debug)]
pub struct ProbeResult {
    pub endpoint: Endpoint,
    pub outcome: Result<ParsedInfo, ProbeError>,
}

impl ProbeResult {
    /// Resolves the reported value, turning an absent field into an error.
    pub fn into_value(self, field: &FieldPath) -> (Endpoint, Result<String, ProbeError>) {
        let value = self.outcome.and_then(|info| field_value(&info, field));
        (self.endpoint, value)
    }
}

/// Receives one line per endpoint.
///
/// A write error ends the run: results that cannot be delivered are not
/// worth probing for.
pub trait ReportSink {
    fn success(&mut self, endpoint: &Endpoint, value: &str) -> io::Result<()>;
    fn failure(&mut self, endpoint: &Endpoint, error: &ProbeError) -> io::Result<()>;

    /// Called once after the last endpoint.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Totals of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub fn field_value(info: &ParsedInfo, field: &FieldPath) -> Result<String, ProbeError> {
    info.get(&field.section, &field.key)
        .map(str::to_string)
        .ok_or_else(|| ProbeError::MissingField {
            section: field.section.clone(),
            key: field.key.clone(),
        })
}

/// Builds the endpoint list, every port of the first host before the second host.
pub fn plan_endpoints(hosts: &[String], ports: &[u16]) -> Vec<Endpoint> {
    hosts
        .iter()
        .flat_map(|host| ports.iter().map(move |port| Endpoint::new(host.clone(), *port)))
        .collect()
}

/// Fetches and parses the reply of a single endpoint.
pub async fn probe_endpoint<T>(
    transport: &T,
    parser: InfoParser,
    endpoint: Endpoint,
    limit: Duration,
) -> ProbeResult
where
    T: Transport + ?Sized,
{
    debug!(%endpoint, "probing");

    let outcome = match transport.fetch(&endpoint, limit).await {
        Ok(reply) => parser.parse(&reply).map_err(ProbeError::from),
        Err(e) => Err(ProbeError::from(e)),
    };

    if let Err(e) = &outcome {
        debug!(%endpoint, error = %e, "probe failed");
    }

    ProbeResult { endpoint, outcome }
}

/// Probes every endpoint, yielding results in input order.
pub fn probe_all<'a, T>(
    transport: &'a T,
    endpoints: Vec<Endpoint>,
    cfg: &'a Config,
) -> impl Stream<Item = ProbeResult> + 'a
where
    T: Transport + ?Sized,
{
    let parser = InfoParser::new(cfg.malformed_lines);
    let width = cfg.concurrency.max(1);

    stream::iter(endpoints)
        .map(move |endpoint| probe_endpoint(transport, parser, endpoint, cfg.timeout))
        .buffered(width)
}

/// Probes every host on every configured port and reports each outcome.
///
/// Only a failure to write a report line is returned as an error; endpoint
/// failures are counted in the summary.
pub async fn run<T, S>(
    transport: &T,
    hosts: &[String],
    cfg: &Config,
    sink: &mut S,
) -> io::Result<RunSummary>
where
    T: Transport + ?Sized,
    S: ReportSink + ?Sized,
{
    let endpoints = plan_endpoints(hosts, &cfg.ports);
    debug!(
        endpoints = endpoints.len(),
        concurrency = cfg.concurrency,
        "starting probe run"
    );

    let mut summary = RunSummary::default();
    let mut results = Box::pin(probe_all(transport, endpoints, cfg));

    while let Some(result) = results.next().await {
        match result.into_value(&cfg.field) {
            (endpoint, Ok(value)) => {
                summary.succeeded += 1;
                sink.success(&endpoint, &value)?;
            }
            (endpoint, Err(e)) => {
                summary.failed += 1;
                sink.failure(&endpoint, &e)?;
            }
        }
    }

    sink.finish()?;
    Ok(summary)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
