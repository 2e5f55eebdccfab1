use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::config::MalformedLinePolicy;
use crate::info::model::{ParsedInfo, Reply};

/// Record separator used by `INFO` replies.
pub const LINE_TERMINATOR: &str = "\r\n";

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (.+)$").expect("static regex must compile"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The transport produced no text to parse.
    #[error("unreadable reply: {0}")]
    UnreadableReply(String),
    /// A data line without a `:` delimiter.
    #[error("malformed line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },
}

/// Parses `INFO` replies into a [`ParsedInfo`].
///
/// Holds no state besides its policy, so a single parser can be shared
/// between any number of concurrent probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoParser {
    malformed_lines: MalformedLinePolicy,
}

impl InfoParser {
    pub fn new(malformed_lines: MalformedLinePolicy) -> Self {
        Self { malformed_lines }
    }

    /// Parses a transport reply. Replies that carry no text fail with
    /// [`ParseError::UnreadableReply`] without being inspected further.
    pub fn parse(&self, reply: &Reply) -> Result<ParsedInfo, ParseError> {
        match reply {
            Reply::Text(raw) => self.parse_text(raw),
            Reply::Error(msg) | Reply::Unexpected(msg) => {
                Err(ParseError::UnreadableReply(msg.clone()))
            }
        }
    }

    /// Parses raw reply text in a single forward pass.
    pub fn parse_text(&self, raw: &str) -> Result<ParsedInfo, ParseError> {
        let mut info = ParsedInfo::new();
        let mut section: &str = "";

        for (idx, record) in raw.split(LINE_TERMINATOR).enumerate() {
            if record.is_empty() {
                continue;
            }

            if let Some(caps) = SECTION_HEADER.captures(record) {
                if let Some(name) = caps.get(1) {
                    section = name.as_str();
                }
                continue;
            }

            let Some((key, value)) = record.split_once(':') else {
                let line = idx + 1;
                match self.malformed_lines {
                    MalformedLinePolicy::Skip => {
                        debug!(line, content = record, "skipping line without ':'");
                        continue;
                    }
                    MalformedLinePolicy::Fail => {
                        return Err(ParseError::MalformedLine {
                            line,
                            content: record.to_string(),
                        });
                    }
                }
            };

            info.insert(section, key, value);
        }

        Ok(info)
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
