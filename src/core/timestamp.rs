//! Timestamp formatting for the line prefix
//!
//! Lines carry an ISO-like timestamp with second precision and no zone
//! suffix, e.g. `2025-01-08T10:30:45`.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// strftime pattern of the default prefix timestamp
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// Timestamp format options for the line prefix
///
/// # Examples
///
/// ```
/// use rust_remote_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let timestamp = TimestampFormat::Local.format(&Local::now());
/// assert_eq!(timestamp.len(), "2025-01-08T10:30:45".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local wall-clock time: `2025-01-08T10:30:45`
    #[default]
    Local,

    /// Same layout, converted to UTC first
    Utc,

    /// Custom strftime format
    ///
    /// An invalid pattern falls back to the default layout.
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Local => datetime.format(DEFAULT_TIMESTAMP_PATTERN).to_string(),
            TimestampFormat::Utc => datetime
                .with_timezone(&Utc)
                .format(DEFAULT_TIMESTAMP_PATTERN)
                .to_string(),
            TimestampFormat::Custom(pattern) => {
                // DelayedFormat::to_string panics on a bad pattern, write! reports it
                let mut out = String::new();
                if write!(out, "{}", datetime.format(pattern)).is_err() {
                    return datetime.format(DEFAULT_TIMESTAMP_PATTERN).to_string();
                }
                out
            }
        }
    }
}
