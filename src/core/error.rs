//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Remote URL could not be parsed
    #[error("Invalid remote server URL '{url}': {message}")]
    InvalidRemoteUrl { url: String, message: String },

    /// Remote delivery was already set up for this logger
    #[error("Remote server already configured")]
    RemoteAlreadyConfigured,

    /// HTTP client or status error
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Delivery failure reported by a custom transport
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Remote worker already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Remote worker did not acknowledge a request in time
    #[error("Remote worker did not respond within {0:?}")]
    Timeout(std::time::Duration),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid remote URL error
    pub fn remote_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidRemoteUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery<S: Into<String>>(msg: S) -> Self {
        LoggerError::Delivery(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
