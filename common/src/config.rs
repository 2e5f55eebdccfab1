use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Ports probed when no port expression is given.
pub const DEFAULT_PORTS: [u16; 3] = [11379, 11380, 11381];

/// Connect and command timeout applied to each endpoint.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid field '{0}': expected SECTION.KEY")]
    InvalidField(String),
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// What the parser does with a data line that has no `:` delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Drop the line and keep parsing.
    #[default]
    Skip,
    /// Fail the whole reply.
    Fail,
}

/// Selects one value out of a parsed reply, written `Section.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub section: String,
    pub key: String,
}

impl FieldPath {
    pub fn new(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
        }
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::new("Clients", "connected_clients")
    }
}

impl FromStr for FieldPath {
    type Err = ConfigError;

    /// Splits on the first `.`; the key itself may contain dots.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((section, key)) if !key.is_empty() => Ok(Self::new(section, key)),
            _ => Err(ConfigError::InvalidField(s.to_string())),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.key)
    }
}

pub struct Config {
    /// Ports used for every host.
    pub ports: Vec<u16>,
    /// Deadline for connecting and reading the reply of one endpoint.
    pub timeout: Duration,
    /// Number of endpoints probed at the same time.
    ///
    /// Output order does not depend on this value.
    pub concurrency: usize,
    /// Value reported for each endpoint.
    pub field: FieldPath,
    pub malformed_lines: MalformedLinePolicy,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: 1,
            field: FieldPath::default(),
            malformed_lines: MalformedLinePolicy::default(),
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
