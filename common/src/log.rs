//! Logging macros shared across the workspace.
//!
//! Thin wrappers over `tracing` so call sites read the same in every crate.
//! `success!` logs at info level under the `fleetprobe::success` target, which
//! the terminal formatter renders with its own symbol.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "fleetprobe::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}
