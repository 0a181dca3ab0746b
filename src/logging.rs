//! Log subscriber setup.
//!
//! The library only emits `tracing` events. Installing a subscriber is the
//! caller's decision: the binary calls [`init`], tests and embedders can
//! scope [`subscriber`] with `tracing::subscriber::with_default`.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Build a fmt subscriber without installing it.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn subscriber(config: &LoggingConfig) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish()
}

/// Install the subscriber process-wide.
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(config))
        .map_err(|e| Error::Config(format!("Failed to install log subscriber: {}", e)))
}
