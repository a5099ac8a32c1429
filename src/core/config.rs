//! Logger configuration
//!
//! Every field has a default, so an empty JSON object or an empty
//! environment yields a console-only logger at Info level.

use super::error::{LoggerError, Result};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the remote server URL
pub const ENV_REMOTE_SERVER: &str = "LOGGER_REMOTE_SERVER";

/// Environment variable enabling debug mode
pub const ENV_DEBUG: &str = "LOGGER_DEBUG";

pub const DEFAULT_QUEUE_CAPACITY: usize = 20;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on the fatal-path drain: one request timeout plus a margin
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Remote endpoint receiving error/fatal batches; `None` disables shipping
    pub remote_server: Option<String>,
    /// Start with the Debug threshold instead of Info
    pub debug: bool,
    /// Capacity of the bounded queue in front of the remote worker
    pub queue_capacity: usize,
    pub flush_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub timestamp_format: TimestampFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            remote_server: None,
            debug: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL.as_millis() as u64,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `LOGGER_REMOTE_SERVER` and `LOGGER_DEBUG` from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let remote_server = lookup(ENV_REMOTE_SERVER)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let debug = lookup(ENV_DEBUG)
            .map(|value| {
                matches!(
                    value.trim().to_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false);

        Self {
            remote_server,
            debug,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be positive",
            ));
        }
        for (name, value) in [
            ("flush_interval_ms", self.flush_interval_ms),
            ("request_timeout_ms", self.request_timeout_ms),
            ("shutdown_timeout_ms", self.shutdown_timeout_ms),
        ] {
            if value == 0 {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    format!("{} must be positive", name),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_remote_server(mut self, url: impl Into<String>) -> Self {
        self.remote_server = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
