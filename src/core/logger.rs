//! Main logger implementation

use super::{
    appender::{Appender, LocalSink},
    config::{
        LoggerConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT,
        DEFAULT_SHUTDOWN_TIMEOUT,
    },
    error::{LoggerError, Result},
    exit::{ExitHandler, ProcessExit, FATAL_EXIT_CODE},
    formatter::LineFormatter,
    log_level::{should_emit, LogLevel},
    metrics::RemoteMetrics,
    timestamp::TimestampFormat,
};
use crate::appenders::ConsoleAppender;
use crate::remote::{BatcherConfig, HttpTransport, RemoteBatcher, Transport};
use parking_lot::RwLock;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Leveled logger with optional remote shipping of error and fatal lines.
///
/// Every call is filtered by the threshold, formatted, and written to the
/// local sink. Error and fatal lines are also handed to the remote batcher
/// once [`Logger::setup_remote_server`] has been called.
///
/// # Example
///
/// ```
/// use rust_remote_logger::prelude::*;
///
/// let logger = Logger::new();
/// logger.info("listening on port %d", &[&8080]);
/// logger.debug("hidden until debug mode is enabled", &[]);
/// ```
pub struct Logger {
    threshold: RwLock<LogLevel>,
    formatter: LineFormatter,
    sink: LocalSink,
    remote: OnceLock<RemoteBatcher>,
    exit_handler: Arc<dyn ExitHandler>,
    batcher_config: BatcherConfig,
    request_timeout: Duration,
    shutdown_timeout: Duration,
}

impl Logger {
    /// Console logger at Info level without remote shipping
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Build a logger from configuration, enabling debug mode and remote
    /// shipping as requested.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or remote URL.
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        // Reject a bad URL before debug mode announces anything
        let transport = config
            .remote_server
            .as_deref()
            .map(|url| HttpTransport::new(url, config.request_timeout()).map(|t| (url, t)))
            .transpose()?;

        let logger = LoggerBuilder::new()
            .timestamp_format(config.timestamp_format.clone())
            .queue_capacity(config.queue_capacity)
            .flush_interval(config.flush_interval())
            .request_timeout(config.request_timeout())
            .shutdown_timeout(config.shutdown_timeout())
            .build();

        if config.debug {
            logger.enable_debug();
        }
        if let Some((url, transport)) = transport {
            logger.install_http_transport(url, transport)?;
        }

        Ok(logger)
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Current threshold
    pub fn threshold(&self) -> LogLevel {
        *self.threshold.read()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        should_emit(self.threshold(), level)
    }

    /// Raise the threshold to Debug.
    ///
    /// Announces `Debug mode enabled` at Info, filtered by the threshold in
    /// effect before the change. Returns `false` without announcing when
    /// debug mode was already on.
    pub fn enable_debug(&self) -> bool {
        let previous = {
            let mut threshold = self.threshold.write();
            if *threshold == LogLevel::Debug {
                return false;
            }
            std::mem::replace(&mut *threshold, LogLevel::Debug)
        };

        if should_emit(previous, LogLevel::Info) {
            let line = self
                .formatter
                .format(LogLevel::Info, "Debug mode enabled", &[]);
            self.sink.write(&line);
        }
        true
    }

    /// Start shipping error and fatal lines to `url` over HTTP.
    ///
    /// # Errors
    ///
    /// [`LoggerError::InvalidRemoteUrl`] for a bad URL,
    /// [`LoggerError::RemoteAlreadyConfigured`] on a second call.
    pub fn setup_remote_server(&self, url: &str) -> Result<()> {
        if self.remote.get().is_some() {
            return Err(LoggerError::RemoteAlreadyConfigured);
        }
        let transport = HttpTransport::new(url, self.request_timeout)?;
        self.install_http_transport(url, transport)
    }

    fn install_http_transport(&self, url: &str, transport: HttpTransport) -> Result<()> {
        self.setup_remote_transport(Box::new(transport))?;
        self.info(
            "Enable pushing error/fatal logs to remote server %q",
            &[&url],
        );
        Ok(())
    }

    /// Start shipping error and fatal lines through a custom transport.
    ///
    /// # Errors
    ///
    /// [`LoggerError::RemoteAlreadyConfigured`] if remote shipping is
    /// already set up.
    pub fn setup_remote_transport(&self, transport: Box<dyn Transport>) -> Result<()> {
        if self.remote.get().is_some() {
            return Err(LoggerError::RemoteAlreadyConfigured);
        }
        let batcher = RemoteBatcher::spawn(
            transport,
            self.sink.clone(),
            self.formatter.clone(),
            self.batcher_config,
        )?;
        self.remote
            .set(batcher)
            .map_err(|_| LoggerError::RemoteAlreadyConfigured)
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.get().is_some()
    }

    /// Snapshot of the remote delivery counters, if shipping is enabled
    pub fn remote_metrics(&self) -> Option<RemoteMetrics> {
        self.remote.get().map(|remote| remote.metrics().clone())
    }

    /// Hand a rendered line to the remote batcher.
    ///
    /// Blocks while the batcher queue is full. No-op without remote shipping.
    pub fn push(&self, line: impl Into<String>) {
        if let Some(remote) = self.remote.get() {
            remote.push(line);
        }
    }

    pub fn log(&self, level: LogLevel, template: &str, args: &[&dyn Display]) {
        if level == LogLevel::Fatal {
            self.fatal(template, args);
            return;
        }
        if !self.is_enabled(level) {
            return;
        }

        let line = self.formatter.format(level, template, args);
        self.sink.write(&line);
        if level.is_remote() {
            self.push(line);
        }
    }

    #[inline]
    pub fn debug(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn info(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn warn(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Warn, template, args);
    }

    /// Log at Error and queue the line for remote delivery without waiting
    #[inline]
    pub fn error(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Error, template, args);
    }

    /// Log at Fatal and terminate the process.
    ///
    /// The line is written locally first. With remote shipping enabled it
    /// is then queued, the batcher is shut down, and the call waits for the
    /// final flush to be acknowledged (bounded by the shutdown timeout)
    /// before invoking the exit handler with [`FATAL_EXIT_CODE`].
    pub fn fatal(&self, template: &str, args: &[&dyn Display]) {
        if self.is_enabled(LogLevel::Fatal) {
            let line = self.formatter.format(LogLevel::Fatal, template, args);
            self.sink.write(&line);

            if let Some(remote) = self.remote.get() {
                let deadline = Instant::now() + self.shutdown_timeout;
                if !remote.push_timeout(line, self.shutdown_timeout) {
                    eprintln!("[LOGGER WARNING] Fatal line could not be queued for remote delivery");
                }
                remote.shutdown(deadline.saturating_duration_since(Instant::now()));
            }
        }

        self.sink.flush();
        self.exit_handler.exit(FATAL_EXIT_CODE);
    }

    /// Flush the local sink and deliver the pending remote batch now
    pub fn flush(&self) -> Result<()> {
        self.sink.flush();
        match self.remote.get() {
            Some(remote) => remote.flush_now(self.shutdown_timeout),
            None => Ok(()),
        }
    }

    /// Drain and stop remote shipping, waiting up to `timeout`.
    ///
    /// Returns `true` when there was nothing to stop or the final flush was
    /// acknowledged in time. Later error lines are only written locally.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let drained = match self.remote.get() {
            Some(remote) => remote.shutdown(timeout),
            None => true,
        };
        self.sink.flush();
        drained
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_remote_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .debug(true)
///     .appender(ConsoleAppender::new())
///     .flush_interval(Duration::from_secs(2))
///     .build();
/// assert_eq!(logger.threshold(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    debug: bool,
    appender: Option<Box<dyn Appender>>,
    timestamp_format: TimestampFormat,
    batcher_config: BatcherConfig,
    request_timeout: Duration,
    shutdown_timeout: Duration,
    exit_handler: Option<Arc<dyn ExitHandler>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            debug: false,
            appender: None,
            timestamp_format: TimestampFormat::default(),
            batcher_config: BatcherConfig {
                queue_capacity: DEFAULT_QUEUE_CAPACITY,
                flush_interval: DEFAULT_FLUSH_INTERVAL,
            },
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            exit_handler: None,
        }
    }

    /// Start at the Debug threshold instead of Info
    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replace the console appender as the local sink
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.batcher_config.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.batcher_config.flush_interval = interval;
        self
    }

    /// Timeout of one HTTP delivery
    #[must_use = "builder methods return a new value"]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Bound on the fatal-path drain and on [`Logger::flush`]
    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Replace `std::process::exit` on the fatal path
    #[must_use = "builder methods return a new value"]
    pub fn exit_handler<H: ExitHandler + 'static>(mut self, handler: H) -> Self {
        self.exit_handler = Some(Arc::new(handler));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let appender = self
            .appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));
        let threshold = if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        Logger {
            threshold: RwLock::new(threshold),
            formatter: LineFormatter::new(self.timestamp_format),
            sink: LocalSink::new(appender),
            remote: OnceLock::new(),
            exit_handler: self.exit_handler.unwrap_or_else(|| Arc::new(ProcessExit)),
            batcher_config: self.batcher_config,
            request_timeout: self.request_timeout,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
