//! Shared fakes for integration tests

#![allow(dead_code)]

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rust_remote_logger::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something observable that happened during a test, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Local(LogLevel, String),
    Delivered(String),
    Exit(i32),
}

/// Ordered event log shared by the fakes below
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<Event>>>);

impl Events {
    pub fn record(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn all(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn local_lines(&self) -> Vec<(LogLevel, String)> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                Event::Local(level, line) => Some((level, line)),
                _ => None,
            })
            .collect()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                Event::Delivered(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn exits(&self) -> Vec<i32> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                Event::Exit(code) => Some(code),
                _ => None,
            })
            .collect()
    }

    /// Poll until `count` payloads were delivered or `timeout` passes
    pub fn wait_for_payloads(&self, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let payloads = self.payloads();
            if payloads.len() >= count || Instant::now() >= deadline {
                return payloads;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

pub struct CaptureAppender {
    pub events: Events,
}

impl Appender for CaptureAppender {
    fn append(&mut self, line: &LogLine) -> Result<()> {
        self.events
            .record(Event::Local(line.level(), line.as_str().to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Transport that records every payload and can be told to fail
pub struct FakeTransport {
    pub events: Events,
    pub fail: bool,
    pub attempts: Arc<Mutex<usize>>,
}

impl FakeTransport {
    pub fn new(events: &Events) -> Self {
        Self {
            events: events.clone(),
            fail: false,
            attempts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(events: &Events) -> Self {
        Self {
            fail: true,
            ..Self::new(events)
        }
    }
}

impl Transport for FakeTransport {
    fn deliver(&mut self, payload: &str) -> Result<()> {
        *self.attempts.lock() += 1;
        if self.fail {
            return Err(LoggerError::delivery("connection refused"));
        }
        self.events.record(Event::Delivered(payload.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Transport whose first delivery blocks until released
pub struct GateTransport {
    pub events: Events,
    pub entered: Sender<()>,
    pub release: Receiver<()>,
}

impl Transport for GateTransport {
    fn deliver(&mut self, payload: &str) -> Result<()> {
        let _ = self.entered.send(());
        // Returns at once after the release sender is dropped
        let _ = self.release.recv();
        self.events.record(Event::Delivered(payload.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "gate"
    }
}

pub struct RecordingExit {
    pub events: Events,
}

impl ExitHandler for RecordingExit {
    fn exit(&self, code: i32) {
        self.events.record(Event::Exit(code));
    }
}

/// Logger writing to `events`, with a recorded exit and a flush timer
/// long enough never to fire during a test
pub fn test_logger(events: &Events) -> Logger {
    Logger::builder()
        .appender(CaptureAppender {
            events: events.clone(),
        })
        .exit_handler(RecordingExit {
            events: events.clone(),
        })
        .flush_interval(Duration::from_secs(3600))
        .build()
}
