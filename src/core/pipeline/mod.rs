//! # Pipeline Module
//!
//! Orchestrates a scan-and-organize run.
//!
//! ## Phases
//! 1. **Counting** - Walk the tree once to size the progress denominator
//! 2. **Processing** - Walk again, classify each file, and hand it to a
//!    worker that fingerprints, deduplicates and places it
//! 3. **Completed / Aborted** - Wait for outstanding work, emit 100%, report
//!
//! ## Parallelism
//! The walk runs on the calling thread. Each run builds its own rayon
//! pool of `max(1, cores - 1)` workers.
//!
//! ## Cancellation
//! [`ScanCoordinator::abort_scan`] sets a [`CancellationToken`] that the
//! walk checks before dispatching a file and each worker checks before
//! starting one. Work already underway is never interrupted.

mod coordinator;
mod executor;
mod state;

pub use coordinator::ScanCoordinator;
pub use executor::{format_duration, CategorySummary, ScanReport, ScanRun};
pub use state::{CancellationToken, CategoryResults, ProcessedFiles, ScanState};
