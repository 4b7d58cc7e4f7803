//! Configuration loading and validation for the skeleton service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any value is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TCP port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds, enforced by the timeout layer.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Value of the `service_name` field attached to every log record.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_port() -> u16 {
    7100
}
fn default_read_timeout() -> u64 {
    5
}
fn default_log_level() -> String {
    "debug".into()
}
fn default_service_name() -> String {
    "rest-api".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            anyhow::bail!("SERVICE_NAME is required and must not be empty");
        }
        if self.read_timeout_secs == 0 {
            anyhow::bail!("READ_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            read_timeout_secs: default_read_timeout(),
            log_level: default_log_level(),
            service_name: default_service_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_port(), 7100);
        assert_eq!(default_read_timeout(), 5);
        assert_eq!(default_log_level(), "debug");
        assert_eq!(default_service_name(), "rest-api");
    }

    #[test]
    fn validate_rejects_empty_service_name() {
        let cfg = Config {
            service_name: "  ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            read_timeout_secs: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
