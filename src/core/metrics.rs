//! Remote delivery metrics
//!
//! Counters describing the health of the remote batcher: how many lines
//! reached it, how many collapsed as duplicates, and how batches fared.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for remote batch delivery
///
/// # Example
///
/// ```
/// use rust_remote_logger::RemoteMetrics;
///
/// let metrics = RemoteMetrics::new();
/// metrics.record_received();
/// metrics.record_delivered(1);
///
/// assert_eq!(metrics.lines_received(), 1);
/// assert_eq!(metrics.batches_delivered(), 1);
/// ```
#[derive(Debug)]
pub struct RemoteMetrics {
    /// Lines taken off the queue by the worker
    lines_received: AtomicU64,

    /// Lines that matched a line already pending in the batch
    duplicates_collapsed: AtomicU64,

    /// Batches the transport accepted
    batches_delivered: AtomicU64,

    /// Batches the transport rejected
    batches_failed: AtomicU64,

    /// Distinct lines inside accepted batches
    lines_delivered: AtomicU64,

    /// Distinct lines inside rejected batches
    lines_dropped: AtomicU64,
}

impl RemoteMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_received: AtomicU64::new(0),
            duplicates_collapsed: AtomicU64::new(0),
            batches_delivered: AtomicU64::new(0),
            batches_failed: AtomicU64::new(0),
            lines_delivered: AtomicU64::new(0),
            lines_dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_received(&self) -> u64 {
        self.lines_received.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn duplicates_collapsed(&self) -> u64 {
        self.duplicates_collapsed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_delivered(&self) -> u64 {
        self.batches_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_failed(&self) -> u64 {
        self.batches_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_delivered(&self) -> u64 {
        self.lines_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_dropped(&self) -> u64 {
        self.lines_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_received(&self) -> u64 {
        self.lines_received.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_duplicate(&self) -> u64 {
        self.duplicates_collapsed.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an accepted batch of `lines` distinct lines
    #[inline]
    pub fn record_delivered(&self, lines: usize) -> u64 {
        self.lines_delivered.fetch_add(lines as u64, Ordering::Relaxed);
        self.batches_delivered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a rejected batch of `lines` distinct lines
    #[inline]
    pub fn record_failed(&self, lines: usize) -> u64 {
        self.lines_dropped.fetch_add(lines as u64, Ordering::Relaxed);
        self.batches_failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of attempted batches that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no batch has been attempted.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.batches_failed() as f64;
        let total = self.batches_delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for RemoteMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RemoteMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_received: AtomicU64::new(self.lines_received()),
            duplicates_collapsed: AtomicU64::new(self.duplicates_collapsed()),
            batches_delivered: AtomicU64::new(self.batches_delivered()),
            batches_failed: AtomicU64::new(self.batches_failed()),
            lines_delivered: AtomicU64::new(self.lines_delivered()),
            lines_dropped: AtomicU64::new(self.lines_dropped()),
        }
    }
}
