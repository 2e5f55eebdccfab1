//! # INFO Replies
//!
//! Parsing of the sectioned `key:value` text returned by the `INFO` command.
//!
//! ```text
//! # Server
//! redis_version:7.2.4
//!
//! # Clients
//! connected_clients:5
//! ```
//!
//! * [`model::Reply`]: What the transport handed back for one command.
//! * [`model::ParsedInfo`]: Section name to field map.
//! * [`parser::InfoParser`]: Builds a `ParsedInfo` from a `Reply`.

pub mod model;
pub mod parser;
