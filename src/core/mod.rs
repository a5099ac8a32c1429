//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod exit;
pub mod formatter;
pub mod log_level;
pub mod log_line;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::{Appender, LocalSink};
pub use config::{
    LoggerConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SHUTDOWN_TIMEOUT, ENV_DEBUG, ENV_REMOTE_SERVER,
};
pub use error::{LoggerError, Result};
pub use exit::{ExitHandler, ProcessExit, FATAL_EXIT_CODE};
pub use formatter::{interpolate, LineFormatter};
pub use log_level::{should_emit, LogLevel};
pub use log_line::LogLine;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::RemoteMetrics;
pub use timestamp::TimestampFormat;
