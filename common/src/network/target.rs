//! # Range Items
//!
//! A range expression is a comma separated list of items. This module parses a
//! single item, which can be:
//! * A CIDR block (e.g., `10.0.0.0/30`).
//! * An IPv4 range (e.g., `10.0.0.1-3`, `10.0.0.1-1.20`, `10.0.0.1-10.0.1.20`).
//! * A numeric range on the last segment (e.g., `6379-6381`, `node.01-03`).
//! * A literal (e.g., `cache.internal`, `11379`).

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::network::range::{self, Ipv4Range};

static NUMERIC_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>(?:[^,]*\.)?)(?P<start>[0-9]+)-(?P<end>[0-9]+)$")
        .expect("static regex must compile")
});

/// One comma separated item of a range expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeItem {
    /// An inclusive range of IPv4 addresses (also produced by CIDR blocks).
    Ipv4 { ipv4_range: Ipv4Range },
    /// An inclusive numeric range appended to a fixed prefix.
    ///
    /// `width` is non-zero when the start bound was written zero-padded.
    Numeric {
        prefix: String,
        start: u64,
        end: u64,
        width: usize,
    },
    /// A single value taken verbatim.
    Literal { value: String },
}

impl RangeItem {
    /// Number of values this item expands to.
    pub fn count(&self) -> u64 {
        match self {
            RangeItem::Ipv4 { ipv4_range } => ipv4_range.count(),
            RangeItem::Numeric { start, end, .. } => (end - start).saturating_add(1),
            RangeItem::Literal { .. } => 1,
        }
    }

    /// Appends the values of this item, low to high, to `out`.
    pub fn expand_into(&self, out: &mut Vec<String>) {
        match self {
            RangeItem::Ipv4 { ipv4_range } => {
                out.extend(ipv4_range.addresses().map(|ip| ip.to_string()));
            }
            RangeItem::Numeric {
                prefix,
                start,
                end,
                width,
            } => {
                out.extend((*start..=*end).map(|n| format!("{prefix}{n:0width$}")));
            }
            RangeItem::Literal { value } => out.push(value.clone()),
        }
    }
}

impl FromStr for RangeItem {
    type Err = String;

    /// Parses a single item. The caller is responsible for splitting on commas
    /// and trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty item".to_string());
        }

        if s.chars().any(char::is_whitespace) {
            return Err(format!("item '{s}' contains whitespace"));
        }

        if let Some(item) = parse_cidr_range(s)? {
            return Ok(item);
        }

        if let Some(item) = parse_ip_range(s)? {
            return Ok(item);
        }

        if let Some(item) = parse_numeric_range(s)? {
            return Ok(item);
        }

        Ok(RangeItem::Literal {
            value: s.to_string(),
        })
    }
}

/// `10.0.0.0/30` style block, network to broadcast address.
fn parse_cidr_range(s: &str) -> Result<Option<RangeItem>, String> {
    let Some((addr, bits)) = s.split_once('/') else {
        return Ok(None);
    };

    let base = addr
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("'{addr}' is not an IPv4 network: {e}"))?;
    let bits = bits
        .parse::<u8>()
        .map_err(|e| format!("'{bits}' is not a prefix length: {e}"))?;

    Ok(Some(RangeItem::Ipv4 {
        ipv4_range: range::cidr_range(base, bits)?,
    }))
}

/// Parses a range string like "10.0.0.1-10.0.0.9" or "10.0.0.1-9".
///
/// Returns `Ok(None)` when the text before the dash is not an IPv4 address.
fn parse_ip_range(s: &str) -> Result<Option<RangeItem>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let Ok(start_addr) = start_str.parse::<Ipv4Addr>() else {
        return Ok(None);
    };

    let end_addr = parse_range_end_addr(end_str, &start_addr, s)?;

    if end_addr < start_addr {
        return Err(format!("End of range '{s}' is lower than its start"));
    }

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(RangeItem::Ipv4 { ipv4_range }))
}

/// Resolves the upper bound of an address range. A full address is taken as
/// is; a shorter dotted tail replaces the last octets of `start`, so with a
/// start of `10.0.0.1` the tail `50` means `10.0.0.50` and `1.20` means
/// `10.0.1.20`.
fn parse_range_end_addr(tail: &str, start: &Ipv4Addr, item: &str) -> Result<Ipv4Addr, String> {
    if tail.is_empty() {
        return Err(format!("range '{item}' has no upper bound"));
    }

    if let Ok(addr) = tail.parse::<Ipv4Addr>() {
        return Ok(addr);
    }

    let replaced: Vec<u8> = tail
        .split('.')
        .map(str::parse::<u8>)
        .collect::<Result<_, _>>()
        .map_err(|e| format!("'{tail}' is not a valid upper bound: {e}"))?;

    if replaced.len() > 4 {
        return Err(format!("upper bound '{tail}' has more than four octets"));
    }

    let mut octets = start.octets();
    let from = octets.len() - replaced.len();
    octets[from..].copy_from_slice(&replaced);

    Ok(Ipv4Addr::from(octets))
}

/// Parses a numeric suffix range like "6379-6381" or "node.01-03".
fn parse_numeric_range(s: &str) -> Result<Option<RangeItem>, String> {
    let Some(caps) = NUMERIC_RANGE.captures(s) else {
        return Ok(None);
    };

    let prefix = &caps["prefix"];
    let start_str = &caps["start"];
    let end_str = &caps["end"];

    let start = start_str
        .parse::<u64>()
        .map_err(|e| format!("Invalid range start '{start_str}': {e}"))?;
    let end = end_str
        .parse::<u64>()
        .map_err(|e| format!("Invalid range end '{end_str}': {e}"))?;

    if end < start {
        return Err(format!("End of range '{s}' is lower than its start"));
    }

    if is_ipv4_prefix(prefix) && end > u64::from(u8::MAX) {
        return Err(format!("range '{s}' goes past the last octet value 255"));
    }

    let width = if start_str.len() > 1 && start_str.starts_with('0') {
        start_str.len()
    } else {
        0
    };

    Ok(Some(RangeItem::Numeric {
        prefix: prefix.to_string(),
        start,
        end,
        width,
    }))
}

/// True for `a.b.c.` where every part is a valid octet.
fn is_ipv4_prefix(prefix: &str) -> bool {
    let Some(octets) = prefix.strip_suffix('.') else {
        return false;
    };
    let parts: Vec<&str> = octets.split('.').collect();
    parts.len() == 3 && parts.iter().all(|part| part.parse::<u8>().is_ok())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
