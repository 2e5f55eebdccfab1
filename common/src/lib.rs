//! # Fleetprobe Common
//!
//! Pure building blocks shared by the probe engine and the command line.
//! Nothing in this crate performs IO.
//!
//! * **[`network`]**: Range expressions for hosts and ports.
//! * **[`info`]**: Parsing of sectioned `INFO` replies.
//! * **[`config`]**: Run configuration handed to the engine.

pub mod config;
pub mod info;
pub mod log;
pub mod network;
