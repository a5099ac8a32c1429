//! Remote batcher: deduplicating, timer-driven delivery of error lines
//!
//! One worker thread owns the pending set. Callers hand lines over through
//! a bounded channel and talk to the worker through a control channel:
//!
//! - a tick drains the queue and flushes the batch,
//! - a queued line joins the batch (identical lines collapse),
//! - `Flush` drains, flushes and acknowledges,
//! - `Shutdown` drains, flushes, acknowledges and ends the worker.
//!
//! Every flush empties the set before calling the transport, so a failed
//! delivery drops its batch instead of retrying it.

use crate::core::{
    LineFormatter, LocalSink, LogLevel, LoggerError, RemoteMetrics, Result, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
use crate::remote::transport::Transport;
use crossbeam_channel::{
    bounded, never, select, tick, unbounded, Receiver, RecvTimeoutError, Sender,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatcherConfig {
    /// Lines the queue holds before `push` blocks
    pub queue_capacity: usize,
    /// Period of the flush timer
    pub flush_interval: Duration,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

enum Control {
    Flush(Sender<()>),
    Shutdown(Sender<()>),
}

/// Handle to the background delivery worker
pub struct RemoteBatcher {
    lines: Sender<String>,
    control: Sender<Control>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<RemoteMetrics>,
}

impl RemoteBatcher {
    /// Start the worker with a real flush timer
    pub fn spawn(
        transport: Box<dyn Transport>,
        sink: LocalSink,
        formatter: LineFormatter,
        config: BatcherConfig,
    ) -> Result<Self> {
        if config.flush_interval.is_zero() {
            return Err(LoggerError::config(
                "RemoteBatcher",
                "flush interval must be positive",
            ));
        }
        let ticker = tick(config.flush_interval);
        Self::spawn_with_ticker(transport, sink, formatter, config.queue_capacity, ticker)
    }

    /// Start the worker driven by an external tick source.
    ///
    /// Every value received on `ticker` triggers one flush, which lets
    /// tests advance time by hand. A disconnected ticker stops periodic
    /// flushing; explicit flushes and shutdown still work.
    pub fn spawn_with_ticker(
        transport: Box<dyn Transport>,
        sink: LocalSink,
        formatter: LineFormatter,
        queue_capacity: usize,
        ticker: Receiver<Instant>,
    ) -> Result<Self> {
        if queue_capacity == 0 {
            return Err(LoggerError::config(
                "RemoteBatcher",
                "queue capacity must be positive",
            ));
        }

        let (line_tx, line_rx) = bounded(queue_capacity);
        let (control_tx, control_rx) = unbounded();
        let metrics = Arc::new(RemoteMetrics::new());

        let worker = Worker {
            lines: line_rx,
            control: control_rx,
            ticker,
            batch: Batch {
                pending: PendingSet::default(),
                transport,
                sink,
                formatter,
                metrics: Arc::clone(&metrics),
            },
        };

        let handle = thread::Builder::new()
            .name("remote-log-batcher".to_string())
            .spawn(move || worker.run())?;

        Ok(Self {
            lines: line_tx,
            control: control_tx,
            handle: Mutex::new(Some(handle)),
            metrics,
        })
    }

    /// Queue a line for the next batch.
    ///
    /// Blocks while the queue is full. After the worker has stopped this
    /// is a no-op.
    pub fn push(&self, line: impl Into<String>) {
        let _ = self.lines.send(line.into());
    }

    /// Queue a line, giving up after `timeout`. Returns whether it was queued.
    pub fn push_timeout(&self, line: impl Into<String>, timeout: Duration) -> bool {
        self.lines.send_timeout(line.into(), timeout).is_ok()
    }

    /// Drain the queue and deliver the current batch now, waiting up to
    /// `timeout` for the worker to finish.
    pub fn flush_now(&self, timeout: Duration) -> Result<()> {
        self.request(Control::Flush, timeout)
    }

    /// Signal shutdown and wait up to `deadline` for the final drain and
    /// flush to be acknowledged. Returns whether the drain completed.
    pub fn shutdown(&self, deadline: Duration) -> bool {
        match self.request(Control::Shutdown, deadline) {
            Ok(()) => {
                let handle = self.handle.lock().take();
                if let Some(handle) = handle {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Remote batcher thread panicked during shutdown: {:?}",
                            e
                        );
                        return false;
                    }
                }
                true
            }
            Err(LoggerError::Timeout(_)) => {
                eprintln!(
                    "[LOGGER WARNING] Remote batcher did not drain within {:?}. \
                     Some logs may not reach the remote server.",
                    deadline
                );
                false
            }
            Err(_) => false,
        }
    }

    fn request(&self, make: fn(Sender<()>) -> Control, timeout: Duration) -> Result<()> {
        let (ack_tx, ack_rx) = bounded(1);
        self.control
            .send(make(ack_tx))
            .map_err(|_| LoggerError::LoggerStopped)?;

        match ack_rx.recv_timeout(timeout) {
            Ok(()) => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(LoggerError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(LoggerError::LoggerStopped),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Lines currently waiting in the queue
    pub fn queued(&self) -> usize {
        self.lines.len()
    }

    pub fn metrics(&self) -> &RemoteMetrics {
        &self.metrics
    }
}

impl Drop for RemoteBatcher {
    fn drop(&mut self) {
        if self.is_running() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Distinct lines in first-arrival order
#[derive(Default)]
struct PendingSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl PendingSet {
    fn insert(&mut self, line: String) -> bool {
        if self.seen.contains(&line) {
            return false;
        }
        self.seen.insert(line.clone());
        self.order.push(line);
        true
    }

    fn take(&mut self) -> Vec<String> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

struct Worker {
    lines: Receiver<String>,
    control: Receiver<Control>,
    ticker: Receiver<Instant>,
    batch: Batch,
}

impl Worker {
    fn run(self) {
        let Worker {
            lines,
            control,
            ticker,
            mut batch,
        } = self;

        let idle = never();
        let mut ticking = true;

        loop {
            let tick_source = if ticking { &ticker } else { &idle };

            select! {
                recv(tick_source) -> tick => {
                    if tick.is_ok() {
                        batch.drain(&lines);
                        batch.flush();
                    } else {
                        ticking = false;
                    }
                }
                recv(lines) -> line => match line {
                    Ok(line) => batch.accept(line),
                    Err(_) => {
                        batch.flush();
                        return;
                    }
                },
                recv(control) -> command => match command {
                    Ok(Control::Flush(ack)) => {
                        batch.drain(&lines);
                        batch.flush();
                        let _ = ack.send(());
                    }
                    Ok(Control::Shutdown(ack)) => {
                        batch.drain(&lines);
                        batch.flush();
                        let _ = ack.send(());
                        return;
                    }
                    Err(_) => {
                        batch.drain(&lines);
                        batch.flush();
                        return;
                    }
                },
            }
        }
    }
}

/// Worker-owned batch state
struct Batch {
    pending: PendingSet,
    transport: Box<dyn Transport>,
    sink: LocalSink,
    formatter: LineFormatter,
    metrics: Arc<RemoteMetrics>,
}

impl Batch {
    fn accept(&mut self, line: String) {
        self.metrics.record_received();
        if !self.pending.insert(line) {
            self.metrics.record_duplicate();
        }
    }

    /// Move what is queued right now into the set. Bounded by the queue
    /// length at entry so steady producers cannot keep the worker here.
    fn drain(&mut self, lines: &Receiver<String>) {
        for _ in 0..lines.len() {
            match lines.try_recv() {
                Ok(line) => self.accept(line),
                Err(_) => break,
            }
        }
    }

    fn flush(&mut self) {
        let lines = self.pending.take();
        if lines.is_empty() {
            return;
        }

        let count = lines.len();
        let payload = lines.join("\n");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.transport.deliver(&payload)
        }));

        let failure = match result {
            Ok(Ok(())) => {
                self.metrics.record_delivered(count);
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic_info) => {
                if let Some(s) = panic_info.downcast_ref::<&str>() {
                    format!("transport panicked: {}", s)
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    format!("transport panicked: {}", s)
                } else {
                    "transport panicked".to_string()
                }
            }
        };

        self.metrics.record_failed(count);
        // Local sink only: routing this through the batcher would feed back
        let line = self.formatter.format(
            LogLevel::Warn,
            "Cannot push logs to remote server: %v",
            &[&failure],
        );
        self.sink.write(&line);
    }
}
