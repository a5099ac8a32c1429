//! Process-wide logger
//!
//! Code that cannot thread a [`Logger`] through its call graph uses the
//! global instance instead. It is created by [`init`], or lazily from the
//! environment (`LOGGER_REMOTE_SERVER`, `LOGGER_DEBUG`) on first use.
//!
//! ```no_run
//! use rust_remote_logger::{error, LoggerConfig};
//!
//! rust_remote_logger::init(LoggerConfig::new().with_remote_server("http://collector:8080/logs"))
//!     .expect("logger initialized once");
//!
//! error!(rust_remote_logger::logger(), "payment %d failed", 1234);
//! ```

use crate::core::{Logger, LoggerConfig, LoggerError, Result};
use std::sync::OnceLock;
use std::time::Duration;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the global logger from `config`.
///
/// # Errors
///
/// Fails if the global logger already exists (explicitly initialized or
/// lazily created by [`logger`]) or if `config` is invalid.
pub fn init(config: LoggerConfig) -> Result<&'static Logger> {
    if GLOBAL.get().is_some() {
        return Err(already_initialized());
    }
    let logger = Logger::from_config(config)?;
    GLOBAL.set(logger).map_err(|_| already_initialized())?;
    GLOBAL.get().ok_or_else(already_initialized)
}

fn already_initialized() -> LoggerError {
    LoggerError::config("global logger", "already initialized")
}

/// The global logger, created from the environment if [`init`] was not called
pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(|| build_or_degrade(LoggerConfig::from_env()))
}

/// Build from `config`. If that fails, retry without the remote server so
/// only remote shipping is lost, then fall back to a plain console logger.
fn build_or_degrade(config: LoggerConfig) -> Logger {
    let error = match Logger::from_config(config.clone()) {
        Ok(logger) => return logger,
        Err(e) => e,
    };
    eprintln!(
        "[LOGGER ERROR] Invalid logger environment ({}), remote shipping disabled",
        error
    );

    let local = LoggerConfig {
        remote_server: None,
        ..config
    };
    Logger::from_config(local).unwrap_or_else(|e| {
        eprintln!("[LOGGER ERROR] Falling back to default logger: {}", e);
        Logger::new()
    })
}

/// Switch the global logger to debug verbosity
pub fn enable_debug() -> bool {
    logger().enable_debug()
}

/// Enable remote shipping on the global logger
pub fn setup_remote_server(url: &str) -> Result<()> {
    logger().setup_remote_server(url)
}

/// Hand a rendered line to the global logger's remote batcher
pub fn push(line: impl Into<String>) {
    logger().push(line);
}

/// Drain and stop remote shipping of the global logger.
///
/// Call before a normal process exit so queued error lines are delivered.
pub fn shutdown(timeout: Duration) -> bool {
    match GLOBAL.get() {
        Some(logger) => logger.shutdown(timeout),
        None => true,
    }
}
