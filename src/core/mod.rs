//! # Core Module
//!
//! The UI-agnostic scan and organize engine.
//!
//! ## Modules
//! - `scanner` - Walks the source tree and classifies files
//! - `hasher` - Computes content fingerprints
//! - `dedup` - Decides which file with given content is the original
//! - `organize` - Plans dated destinations and copies or moves files
//! - `progress` - Turns counters into a percentage for a progress sink
//! - `pipeline` - Runs the whole thing on a worker pool

pub mod dedup;
pub mod hasher;
pub mod organize;
pub mod pipeline;
pub mod progress;
pub mod scanner;

// Re-export commonly used types
pub use hasher::{ContentFingerprint, FingerprintAlgorithm};
pub use organize::{OperationMode, Placement, ScanRequest};
pub use pipeline::{ScanCoordinator, ScanReport};
pub use scanner::{FileEntry, MediaCategory};
