//! Logging macros with printf-style templates.
//!
//! Arguments are borrowed as `&dyn Display` and interpolated at the `%v`,
//! `%s`, `%d`, `%q`... verbs of the template. A mismatch between verbs and
//! arguments is rendered inline, never rejected.
//!
//! # Examples
//!
//! ```
//! use rust_remote_logger::prelude::*;
//! use rust_remote_logger::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With printf-style arguments
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//!
//! let user_id = 42;
//! let action = "login";
//! info!(logger, "User %d performed action: %q", user_id, action);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_remote_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_remote_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Warn, "Status code: %d", 429);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            $level,
            $template,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_remote_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_remote_logger::debug;
/// logger.enable_debug();
/// debug!(logger, "Cache miss for key %q", "user:42");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_remote_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_remote_logger::warn;
/// warn!(logger, "Retry attempt %d of %d", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message and queue it for remote delivery.
///
/// # Examples
///
/// ```
/// # use rust_remote_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_remote_logger::error;
/// error!(logger, "Error code: %d, message: %s", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and terminate the process.
///
/// # Examples
///
/// ```no_run
/// # use rust_remote_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_remote_logger::fatal;
/// fatal!(logger, "Unable to recover from error: %v", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
