//! Integration tests for the logger and its remote batcher
//!
//! These tests verify:
//! - Fatal lines reach the remote server before the process exits
//! - Failed deliveries are reported locally and not retried
//! - Timer-driven flushes with a hand-driven ticker
//! - Back-pressure when the queue is full
//! - End-to-end HTTP delivery

mod common;

use common::{Event, Events, FakeTransport, GateTransport};
use crossbeam_channel::{bounded, unbounded, RecvTimeoutError};
use rust_remote_logger::prelude::*;
use rust_remote_logger::{LineFormatter, LocalSink, RemoteBatcher};
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_fatal_with_remote_delivers_before_exit() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_transport(Box::new(FakeTransport::new(&events)))
        .expect("remote setup");

    logger.fatal("boom", &[]);

    let all = events.all();
    let local = all
        .iter()
        .position(|e| matches!(e, Event::Local(LogLevel::Fatal, line) if line.ends_with("[FATAL] boom")))
        .expect("fatal line written locally");
    let delivered = all
        .iter()
        .position(|e| matches!(e, Event::Delivered(payload) if payload.contains("boom")))
        .expect("fatal line delivered");
    let exit = all
        .iter()
        .position(|e| matches!(e, Event::Exit(_)))
        .expect("exit observed");

    assert!(local < delivered, "local write must precede delivery: {all:?}");
    assert!(delivered < exit, "delivery must precede exit: {all:?}");
    assert_eq!(events.exits(), vec![FATAL_EXIT_CODE]);
    assert_ne!(FATAL_EXIT_CODE, 0);
}

#[test]
fn test_fatal_drains_earlier_errors_in_same_batch() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_transport(Box::new(FakeTransport::new(&events)))
        .expect("remote setup");

    logger.error("first failure %d", &[&1]);
    logger.error("second failure %d", &[&2]);
    logger.fatal("giving up", &[]);

    let payloads = events.payloads();
    assert_eq!(payloads.len(), 1, "one final batch expected: {payloads:?}");
    let lines: Vec<&str> = payloads[0].split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("[ERROR] first failure 1"));
    assert!(lines[1].ends_with("[ERROR] second failure 2"));
    assert!(lines[2].ends_with("[FATAL] giving up"));
    assert!(!payloads[0].ends_with('\n'));
}

#[test]
fn test_only_error_and_fatal_are_shipped() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    logger.enable_debug();
    logger
        .setup_remote_transport(Box::new(FakeTransport::new(&events)))
        .expect("remote setup");

    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.warn("w", &[]);
    logger.error("e", &[]);
    logger.flush().expect("flush acknowledged");

    let payloads = events.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].ends_with("[ERROR] e"));
    assert!(!payloads[0].contains('\n'));
    assert_eq!(events.local_lines().len(), 5);
    assert!(events.exits().is_empty(), "error must not terminate");
}

#[test]
fn test_identical_lines_delivered_once() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_transport(Box::new(FakeTransport::new(&events)))
        .expect("remote setup");

    logger.push("[2025-01-08T10:30:45] [ERROR] duplicate");
    logger.push("[2025-01-08T10:30:45] [ERROR] duplicate");
    logger.flush().expect("flush acknowledged");

    assert_eq!(
        events.payloads(),
        vec!["[2025-01-08T10:30:45] [ERROR] duplicate".to_string()]
    );
    let metrics = logger.remote_metrics().expect("remote enabled");
    assert_eq!(metrics.lines_received(), 2);
    assert_eq!(metrics.duplicates_collapsed(), 1);
}

#[test]
fn test_delivery_failure_is_reported_and_not_retried() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    let transport = FakeTransport::failing(&events);
    let attempts = transport.attempts.clone();
    logger
        .setup_remote_transport(Box::new(transport))
        .expect("remote setup");

    logger.error("database unavailable", &[]);
    logger.flush().expect("flush acknowledged");
    logger.flush().expect("flush acknowledged");

    assert_eq!(*attempts.lock(), 1, "failed batch must be dropped, not retried");
    assert!(events.payloads().is_empty());

    let warnings: Vec<String> = events
        .local_lines()
        .into_iter()
        .filter(|(level, _)| *level == LogLevel::Warn)
        .map(|(_, line)| line)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Cannot push logs to remote server"));
    assert!(warnings[0].contains("connection refused"));

    let metrics = logger.remote_metrics().expect("remote enabled");
    assert_eq!(metrics.batches_failed(), 1);
    assert_eq!(metrics.lines_dropped(), 1);
}

#[test]
fn test_timer_flush_with_virtual_ticker() {
    let events = Events::default();
    let (tick_tx, tick_rx) = unbounded();
    let batcher = RemoteBatcher::spawn_with_ticker(
        Box::new(FakeTransport::new(&events)),
        LocalSink::new(Box::new(common::CaptureAppender {
            events: events.clone(),
        })),
        LineFormatter::default(),
        20,
        tick_rx,
    )
    .expect("spawn batcher");

    batcher.push("[2025-01-08T10:30:45] [ERROR] only line");
    // Advance past one flush interval
    tick_tx.send(Instant::now()).expect("worker alive");

    let payloads = events.wait_for_payloads(1, WAIT);
    assert_eq!(payloads, vec!["[2025-01-08T10:30:45] [ERROR] only line".to_string()]);

    // A later tick with nothing pending delivers nothing
    tick_tx.send(Instant::now()).expect("worker alive");
    thread::sleep(Duration::from_millis(100));
    assert_eq!(events.payloads().len(), 1);
    assert_eq!(batcher.metrics().batches_delivered(), 1);
}

#[test]
fn test_push_blocks_when_queue_is_full() {
    let events = Events::default();
    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = bounded::<()>(0);
    let (tick_tx, tick_rx) = unbounded();
    let capacity = 4;

    let batcher = RemoteBatcher::spawn_with_ticker(
        Box::new(GateTransport {
            events: events.clone(),
            entered: entered_tx,
            release: release_rx,
        }),
        LocalSink::new(Box::new(common::CaptureAppender {
            events: events.clone(),
        })),
        LineFormatter::default(),
        capacity,
        tick_rx,
    )
    .expect("spawn batcher");

    // Park the worker inside a delivery so nothing consumes the queue
    batcher.push("[t] [ERROR] in flight");
    tick_tx.send(Instant::now()).expect("worker alive");
    entered_rx
        .recv_timeout(WAIT)
        .expect("worker entered delivery");

    for i in 0..capacity {
        batcher.push(format!("[t] [ERROR] queued {i}"));
    }
    assert_eq!(batcher.queued(), capacity);

    let (done_tx, done_rx) = bounded(1);
    thread::scope(|scope| {
        scope.spawn(|| {
            batcher.push("[t] [ERROR] one too many");
            let _ = done_tx.send(());
        });

        assert_eq!(
            done_rx.recv_timeout(Duration::from_millis(200)),
            Err(RecvTimeoutError::Timeout),
            "push must block while the queue is full"
        );

        drop(release_tx);
        done_rx
            .recv_timeout(WAIT)
            .expect("push completes once the worker resumes");
    });

    batcher.flush_now(WAIT).expect("flush acknowledged");
    let payloads = events.payloads();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[1].split('\n').count(), capacity + 1);
}

#[test]
fn test_http_delivery_end_to_end() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/logs")
        .match_header("content-type", "text/plain")
        .match_body("[2025-01-08T10:30:45] [ERROR] shipped")
        .with_status(200)
        .expect(1)
        .create();

    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_server(&format!("{}/logs", server.url()))
        .expect("remote setup");

    logger.push("[2025-01-08T10:30:45] [ERROR] shipped");
    logger.push("[2025-01-08T10:30:45] [ERROR] shipped");
    logger.flush().expect("flush acknowledged");

    mock.assert();
    let metrics = logger.remote_metrics().expect("remote enabled");
    assert_eq!(metrics.batches_delivered(), 1);
    assert!(logger.shutdown(WAIT));
}

#[test]
fn test_http_server_error_logs_warning() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/").with_status(500).expect(1).create();

    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_server(&format!("{}/", server.url()))
        .expect("remote setup");

    logger.error("will not arrive", &[]);
    logger.flush().expect("flush acknowledged");

    mock.assert();
    assert!(events
        .local_lines()
        .iter()
        .any(|(level, line)| *level == LogLevel::Warn
            && line.contains("Cannot push logs to remote server")));
}

#[test]
fn test_shutdown_stops_remote_shipping() {
    let events = Events::default();
    let logger = common::test_logger(&events);
    logger
        .setup_remote_transport(Box::new(FakeTransport::new(&events)))
        .expect("remote setup");

    logger.error("before shutdown", &[]);
    assert!(logger.shutdown(WAIT));
    logger.error("after shutdown", &[]);

    let payloads = events.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].ends_with("[ERROR] before shutdown"));
    // Local output keeps working
    assert!(events
        .local_lines()
        .iter()
        .any(|(_, line)| line.ends_with("[ERROR] after shutdown")));
}
