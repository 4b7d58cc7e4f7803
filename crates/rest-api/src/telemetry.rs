//! Tracing subscriber initialisation: structured JSON log output.
//!
//! This is the backend the [`crate::logger::Logger`] capability emits through
//! (via [`crate::logger::sink::TracingSink`]). Log level is configurable via
//! `RUST_LOG`, falling back to the configured level.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Configures an [`EnvFilter`] (environment override first, configured level
/// as fallback) and a JSON-formatted fmt layer for structured log output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}
