//! Logging setup.
//!
//! The only place a global `tracing` subscriber is installed.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `level` is an `EnvFilter` directive (`info`, `kubegate_core=debug,info`).
/// An unparsable directive falls back to `info`. Calling twice is a no-op.
pub fn init_logger(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();

    if installed.is_err() {
        tracing::debug!("Logger already initialized, keeping existing subscriber");
    }
}
