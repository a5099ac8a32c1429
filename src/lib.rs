//! # Rust Remote Logger
//!
//! A process-wide leveled logger with an optional best-effort remote
//! side channel.
//!
//! ## Features
//!
//! - **Leveled output**: Debug/Info to stdout, Warn/Error/Fatal to stderr
//! - **Forgiving formatting**: printf-style templates that never fail
//! - **Remote batching**: error and fatal lines are deduplicated and
//!   posted to a remote server every few seconds
//! - **Fatal drain**: a fatal line is delivered before the process exits

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;
pub mod remote;

pub mod prelude {
    pub use crate::appenders::ConsoleAppender;
    pub use crate::core::{
        Appender, ExitHandler, LineFormatter, LogLevel, LogLine, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, RemoteMetrics, Result, TimestampFormat,
        DEFAULT_SHUTDOWN_TIMEOUT, FATAL_EXIT_CODE,
    };
    pub use crate::remote::{HttpTransport, Transport};
}

pub use appenders::ConsoleAppender;
pub use core::{
    interpolate, should_emit, Appender, ExitHandler, LineFormatter, LocalSink, LogLevel, LogLine,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, ProcessExit, RemoteMetrics, Result,
    TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT, FATAL_EXIT_CODE,
};
pub use global::{enable_debug, init, logger, push, setup_remote_server, shutdown};
pub use remote::{BatcherConfig, HttpTransport, RemoteBatcher, Transport};
