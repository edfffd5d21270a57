//! Per-link delivery counters
//!
//! Each chain link counts the events it saw, the ones it handed to its sink,
//! the ones it filtered out, and sink failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one chain link
///
/// # Example
///
/// ```
/// use rust_log_chain::core::LinkMetrics;
///
/// let metrics = LinkMetrics::new();
/// metrics.record_handled();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.handled(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.filtered(), 0);
/// ```
#[derive(Debug)]
pub struct LinkMetrics {
    /// Events that reached `handle`, processed or not
    handled: AtomicU64,

    /// Events passed to the sink
    delivered: AtomicU64,

    /// Events processed but rejected by the threshold or notify gate
    filtered: AtomicU64,

    /// Sink calls that returned an error
    failed: AtomicU64,
}

impl LinkMetrics {
    pub const fn new() -> Self {
        Self {
            handled: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.handled.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for LinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LinkMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            handled: AtomicU64::new(self.handled()),
            delivered: AtomicU64::new(self.delivered()),
            filtered: AtomicU64::new(self.filtered()),
            failed: AtomicU64::new(self.failed()),
        }
    }
}
