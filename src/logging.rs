//! Logging setup
//!
//! Initializes the tracing subscriber for the demo binary and for
//! applications that do not bring their own.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` for this crate. Calling it a
/// second time returns an error from the subscriber registry.
pub fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agent_feed_sdk=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to initialize logging: {}", err))?;

    Ok(())
}
