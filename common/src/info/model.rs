use std::collections::HashMap;

/// Fields of one section, keyed by field name.
pub type Section = HashMap<String, String>;

/// One reply as produced by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The reply text, records separated by `\r\n`.
    Text(String),
    /// The server answered with an error instead of data.
    Error(String),
    /// The server answered with something other than text (nil, integer, array).
    Unexpected(String),
}

/// A parsed `INFO` reply: section name to fields.
///
/// Fields seen before any section header live in the section named `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInfo {
    sections: HashMap<String, Section>,
}

impl ParsedInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` in `section`, replacing any earlier value.
    pub fn insert(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, fields)| (name.as_str(), fields))
    }

    /// Number of sections holding at least one field.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl From<HashMap<String, Section>> for ParsedInfo {
    fn from(sections: HashMap<String, Section>) -> Self {
        Self { sections }
    }
}
