//! Appender trait for local output destinations, and the shared sink

use super::{error::Result, log_line::LogLine};
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Appender: Send {
    fn append(&mut self, line: &LogLine) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Local sink shared by callers and the remote worker.
///
/// Writes are fire-and-forget: append and flush errors are swallowed so
/// a broken console never fails a logging call.
#[derive(Clone)]
pub struct LocalSink {
    appender: Arc<Mutex<Box<dyn Appender>>>,
}

impl LocalSink {
    pub fn new(appender: Box<dyn Appender>) -> Self {
        Self {
            appender: Arc::new(Mutex::new(appender)),
        }
    }

    pub fn write(&self, line: &LogLine) {
        let _ = self.appender.lock().append(line);
    }

    pub fn flush(&self) {
        let _ = self.appender.lock().flush();
    }

    pub fn name(&self) -> String {
        self.appender.lock().name().to_string()
    }
}
