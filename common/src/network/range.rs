//! Expansion of range expressions into explicit value lists.

use std::net::Ipv4Addr;
use std::ops::Deref;
use std::str::FromStr;

use thiserror::Error;

use crate::network::target::RangeItem;

/// Upper bound on the number of values a single expression may expand to.
pub const MAX_EXPANSION: u64 = 65_536;

/// Ordered, non-empty list of values produced by [`expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRange(Vec<String>);

impl ExpandedRange {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for ExpandedRange {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for ExpandedRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        expand(s).map(ExpandedRange)
    }
}

impl From<ExpandedRange> for Vec<String> {
    fn from(range: ExpandedRange) -> Self {
        range.0
    }
}

/// Entry point for turning host and port expressions into value lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeExpander;

impl RangeExpander {
    pub fn expand(expression: &str) -> Result<ExpandedRange, RangeError> {
        expression.parse()
    }

    pub fn expand_ports(expression: &str) -> Result<Vec<u16>, RangeError> {
        expand_ports(expression)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("malformed range expression '{expression}': {reason}")]
    Malformed { expression: String, reason: String },
}

impl RangeError {
    fn malformed(expression: &str, reason: impl Into<String>) -> Self {
        RangeError::Malformed {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Inclusive span of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    fn bounds(&self) -> (u32, u32) {
        (self.start_addr.into(), self.end_addr.into())
    }

    pub fn count(&self) -> u64 {
        let (low, high) = self.bounds();
        u64::from(high.saturating_sub(low)) + 1
    }

    /// Addresses from start to end, both included.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> {
        let (low, high) = self.bounds();
        (low..=high).map(Ipv4Addr::from)
    }
}

/// Network and broadcast address of `addr/bits`.
pub fn cidr_range(addr: Ipv4Addr, bits: u8) -> Result<Ipv4Range, String> {
    let block = pnet::ipnetwork::Ipv4Network::new(addr, bits).map_err(|e| e.to_string())?;
    Ok(Ipv4Range::new(block.network(), block.broadcast()))
}

/// Expands a range expression into its ordered list of values.
///
/// Items are expanded left to right, each range low to high. Duplicates are
/// kept. The result is never empty.
pub fn expand(expression: &str) -> Result<Vec<String>, RangeError> {
    if expression.trim().is_empty() {
        return Err(RangeError::malformed(expression, "expression is empty"));
    }

    let mut items: Vec<RangeItem> = Vec::new();
    let mut total: u64 = 0;

    for part in expression.split(',') {
        let item = RangeItem::from_str(part.trim())
            .map_err(|reason| RangeError::malformed(expression, reason))?;

        total = total.saturating_add(item.count());
        if total > MAX_EXPANSION {
            return Err(RangeError::malformed(
                expression,
                format!("expands to more than {MAX_EXPANSION} values"),
            ));
        }

        items.push(item);
    }

    let mut values: Vec<String> = Vec::with_capacity(total as usize);
    for item in &items {
        item.expand_into(&mut values);
    }

    Ok(values)
}

/// Expands a port expression, requiring every value to be a valid TCP port.
pub fn expand_ports(expression: &str) -> Result<Vec<u16>, RangeError> {
    expand(expression)?
        .iter()
        .map(|value| match value.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(RangeError::malformed(
                expression,
                format!("'{value}' is not a valid port"),
            )),
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
