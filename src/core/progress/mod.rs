//! # Progress Module
//!
//! Scanned/processed counters and the percentage derived from them.
//!
//! Each file counts twice toward completion: once when the walk sees
//! it and once when a worker finishes with it, so
//! `percent = (scanned + processed) * 100 / (2 * total)`.
//!
//! Updates reach the [`ProgressSink`] only when the percentage moves
//! forward, and [`ProgressTracker::finish`] always ends the run on 100.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Receiver of progress percentages.
///
/// Publishing is fire-and-forget: no acknowledgement, no backpressure.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, percent: u8);
}

/// A sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn publish(&self, _percent: u8) {}
}

/// Percentage for the given counters, clamped to 0..=100.
///
/// An empty tree is complete from the start.
pub fn percent_for(scanned: u64, processed: u64, total_files: u64) -> u8 {
    if total_files == 0 {
        return 100;
    }
    let done = scanned.saturating_add(processed) as u128 * 100;
    let percent = done / (2 * total_files as u128);
    percent.min(100) as u8
}

/// Per-run progress counters
pub struct ProgressTracker {
    total_files: AtomicU64,
    scanned: AtomicU64,
    processed: AtomicU64,
    /// Last value handed to the sink. Held while publishing so the sink
    /// sees a non-decreasing sequence.
    last_emitted: Mutex<u8>,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressTracker {
    pub fn new(total_files: u64, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            total_files: AtomicU64::new(total_files),
            scanned: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            last_emitted: Mutex::new(0),
            sink,
        }
    }

    pub fn record_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::SeqCst);
        self.emit_if_advanced();
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
        self.emit_if_advanced();
    }

    pub fn current_percent(&self) -> u8 {
        percent_for(self.scanned(), self.processed(), self.total_files())
    }

    pub fn scanned(&self) -> u64 {
        self.scanned.load(Ordering::SeqCst)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn total_files(&self) -> u64 {
        self.total_files.load(Ordering::SeqCst)
    }

    /// Set the denominator once the counting pass is done
    pub fn set_total_files(&self, total_files: u64) {
        self.total_files.store(total_files, Ordering::SeqCst);
    }

    /// Last percentage delivered to the sink
    pub fn last_emitted(&self) -> u8 {
        *self.last_emitted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Force the final 100, whether the run completed or was aborted.
    pub fn finish(&self) {
        let mut last = self.last_emitted.lock().unwrap_or_else(PoisonError::into_inner);
        *last = 100;
        self.sink.publish(100);
    }

    fn emit_if_advanced(&self) {
        let mut last = self.last_emitted.lock().unwrap_or_else(PoisonError::into_inner);
        let percent = self.current_percent();
        if percent > *last {
            *last = percent;
            self.sink.publish(percent);
        }
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total_files", &self.total_files())
            .field("scanned", &self.scanned())
            .field("processed", &self.processed())
            .field("last_emitted", &self.last_emitted())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProgressSink;
    use std::sync::Mutex;

    /// Records every published value
    #[derive(Default)]
    pub struct RecordingSink {
        pub values: Mutex<Vec<u8>>,
    }

    impl RecordingSink {
        pub fn values(&self) -> Vec<u8> {
            self.values.lock().unwrap().clone()
        }
    }

    impl ProgressSink for RecordingSink {
        fn publish(&self, percent: u8) {
            self.values.lock().unwrap().push(percent);
        }
    }
}
