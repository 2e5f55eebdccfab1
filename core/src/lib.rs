//! # Fleetprobe Core
//!
//! The probe engine. Connects to every endpoint, fetches its `INFO` reply and
//! hands the parsed result to a [`probe::ReportSink`].
//!
//! * **[`network`]**: The [`network::transport::Transport`] seam and its TCP implementation.
//! * **[`probe`]**: Endpoint planning and the order preserving fan-out.

pub mod network;
pub mod probe;
