use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use fleetprobe_common::info::model::Reply;
use thiserror::Error;

/// A single probed instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(#[source] io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Fetches the raw `INFO` reply of one endpoint.
///
/// The timeout covers the whole exchange, connect included.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Reply, TransportError>;
}
