//! Remote transport: delivers one batch payload to the log server
//!
//! The batcher only sees the [`Transport`] trait. [`HttpTransport`] is the
//! production implementation: one `POST` per batch with a `text/plain`
//! body and a bounded request timeout.

use crate::core::{LoggerError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::time::Duration;

pub trait Transport: Send {
    /// Deliver one newline-joined batch. Called from the worker thread only.
    fn deliver(&mut self, payload: &str) -> Result<()>;
    fn name(&self) -> &str;
}

/// HTTP transport that posts batches to a remote log server
///
/// # Example
///
/// ```no_run
/// use rust_remote_logger::remote::{HttpTransport, Transport};
/// use std::time::Duration;
///
/// let mut transport = HttpTransport::new("http://127.0.0.1:8080/logs", Duration::from_secs(5))
///     .expect("valid URL");
/// transport.deliver("[2025-01-08T10:30:45] [ERROR] disk full").ok();
/// ```
pub struct HttpTransport {
    url: Url,
    timeout: Duration,
    // Built on first delivery so construction stays cheap on the caller thread
    client: Option<Client>,
}

impl HttpTransport {
    /// Create a transport for `url`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidRemoteUrl`] if the URL does not parse
    /// or is not `http`/`https`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| LoggerError::remote_url(url, e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(LoggerError::remote_url(
                    url,
                    format!("unsupported scheme '{}'", other),
                ))
            }
        }

        Ok(Self {
            url: parsed,
            timeout,
            client: None,
        })
    }
}

impl Transport for HttpTransport {
    fn deliver(&mut self, payload: &str) -> Result<()> {
        let client = match self.client.take() {
            Some(client) => client,
            None => Client::builder().timeout(self.timeout).build()?,
        };

        let result = client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(payload.to_owned())
            .send()
            .and_then(|response| response.error_for_status());

        self.client = Some(client);
        result?;
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
