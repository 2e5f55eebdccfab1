#![cfg(test)]
use std::io;
use std::time::Duration;

use fleetprobe_common::config::{Config, MalformedLinePolicy};
use fleetprobe_common::network::range::RangeExpander;
use fleetprobe_core::network::tcp::InfoTransport;
use fleetprobe_core::network::transport::Endpoint;
use fleetprobe_core::probe::{self, ProbeError, ReportSink, RunSummary};

use crate::utils::{FakeServer, Script, clients_reply, closed_port};

#[derive(Default)]
struct Lines {
    out: Vec<String>,
    err: Vec<String>,
}

impl ReportSink for Lines {
    fn success(&mut self, endpoint: &Endpoint, value: &str) -> io::Result<()> {
        self.out.push(format!("{endpoint} : {value}"));
        Ok(())
    }

    fn failure(&mut self, endpoint: &Endpoint, error: &ProbeError) -> io::Result<()> {
        self.err.push(format!("{endpoint} : {error}"));
        Ok(())
    }
}

fn config(ports: Vec<u16>) -> Config {
    Config {
        ports,
        timeout: Duration::from_millis(500),
        ..Config::default()
    }
}

/// An unreachable endpoint between two live ones must not hide either of them.
#[tokio::test]
async fn refused_endpoint_does_not_abort_batch() {
    let first = FakeServer::info(&clients_reply(5)).await;
    let second = FakeServer::info(&clients_reply(8)).await;
    let dead = closed_port().await;

    let hosts = RangeExpander::expand("127.0.0.1").unwrap();
    let cfg = config(vec![first.port, dead, second.port]);
    let mut lines = Lines::default();

    let summary = probe::run(&InfoTransport, &hosts, &cfg, &mut lines).await.unwrap();

    assert_eq!(summary, RunSummary { succeeded: 2, failed: 1 });
    assert_eq!(
        lines.out,
        vec![
            format!("127.0.0.1:{} : 5", first.port),
            format!("127.0.0.1:{} : 8", second.port),
        ]
    );
    assert_eq!(lines.err.len(), 1);
    assert!(
        lines.err[0].starts_with(&format!("127.0.0.1:{dead} : connection failed")),
        "unexpected failure line: {}",
        lines.err[0]
    );
}

#[tokio::test]
async fn error_reply_and_silent_server_are_reported() {
    let noauth = FakeServer::start(Script::Raw(b"-NOAUTH Authentication required.\r\n".to_vec())).await;
    let silent = FakeServer::start(Script::Silent).await;
    let healthy = FakeServer::info(&clients_reply(1)).await;

    let hosts = vec!["127.0.0.1".to_string()];
    let cfg = Config {
        timeout: Duration::from_millis(200),
        ..config(vec![noauth.port, silent.port, healthy.port])
    };
    let mut lines = Lines::default();

    let summary = probe::run(&InfoTransport, &hosts, &cfg, &mut lines).await.unwrap();

    assert_eq!(summary.failed, 2);
    assert_eq!(
        lines.err,
        vec![
            format!("127.0.0.1:{} : unreadable reply: NOAUTH Authentication required.", noauth.port),
            format!("127.0.0.1:{} : timed out after 200ms", silent.port),
        ]
    );
    assert_eq!(lines.out, vec![format!("127.0.0.1:{} : 1", healthy.port)]);
}

#[tokio::test]
async fn missing_clients_section_is_a_failure() {
    let server = FakeServer::info("# Server\r\nredis_version:7.2.4\r\n").await;

    let hosts = vec!["127.0.0.1".to_string()];
    let cfg = config(vec![server.port]);
    let mut lines = Lines::default();

    probe::run(&InfoTransport, &hosts, &cfg, &mut lines).await.unwrap();

    assert!(lines.out.is_empty());
    assert_eq!(
        lines.err,
        vec![format!(
            "127.0.0.1:{} : field Clients.connected_clients not found in reply",
            server.port
        )]
    );
}

#[tokio::test]
async fn stray_line_is_skipped_unless_strict() {
    let body = "# Clients\r\nthis line has no delimiter\r\nconnected_clients:3\r\n";
    let server = FakeServer::info(body).await;
    let hosts = vec!["127.0.0.1".to_string()];

    let mut lenient = Lines::default();
    probe::run(&InfoTransport, &hosts, &config(vec![server.port]), &mut lenient).await.unwrap();
    assert_eq!(lenient.out, vec![format!("127.0.0.1:{} : 3", server.port)]);

    let strict_cfg = Config {
        malformed_lines: MalformedLinePolicy::Fail,
        ..config(vec![server.port])
    };
    let mut strict = Lines::default();
    probe::run(&InfoTransport, &hosts, &strict_cfg, &mut strict).await.unwrap();
    assert!(strict.out.is_empty());
    assert_eq!(
        strict.err,
        vec![format!(
            "127.0.0.1:{} : malformed line 2: 'this line has no delimiter'",
            server.port
        )]
    );
}

#[tokio::test]
async fn concurrent_probe_preserves_order() {
    let mut servers = Vec::new();
    for n in 0..6 {
        servers.push(FakeServer::info(&clients_reply(n)).await);
    }
    let ports: Vec<u16> = servers.iter().map(|s| s.port).collect();

    let hosts = vec!["127.0.0.1".to_string()];
    let cfg = Config {
        concurrency: 4,
        ..config(ports.clone())
    };
    let mut lines = Lines::default();

    let summary = probe::run(&InfoTransport, &hosts, &cfg, &mut lines).await.unwrap();

    assert_eq!(summary.succeeded, 6);
    let expected: Vec<String> = ports
        .iter()
        .enumerate()
        .map(|(n, port)| format!("127.0.0.1:{port} : {n}"))
        .collect();
    assert_eq!(lines.out, expected);
}
