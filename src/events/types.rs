//! Event type definitions for progress reporting.

use crate::core::organize::Placement;
use crate::core::scanner::MediaCategory;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// All events emitted during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Counting and walking events
    Scan(ScanEvent),
    /// Per-file placement events
    Organize(OrganizeEvent),
    /// Run-level events
    Pipeline(PipelineEvent),
}

/// Events during counting and walking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// The counting pass finished
    Counted { total_files: u64, directories: u64 },
    /// Overall progress moved forward
    Progress { percent: u8 },
}

/// Events from the worker pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizeEvent {
    /// A file was copied or moved
    FileOrganized {
        path: PathBuf,
        destination: PathBuf,
        category: MediaCategory,
        placement: Placement,
    },
    /// A file could not be hashed or placed; the run continues
    FileFailed { path: PathBuf, message: String },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// A run has started
    Started { run_id: Uuid, directory: PathBuf },
    /// Moving to a new phase
    PhaseChanged { phase: ScanPhase },
    /// The run finished, normally or by abort
    Finished { summary: RunSummary },
    /// The run could not enumerate its source tree
    Error { message: String },
}

/// Coordinator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    #[default]
    Idle,
    Counting,
    Processing,
    Completed,
    Aborted,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    Completed,
    Aborted,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub outcome: ScanOutcome,
    /// Regular files found by the counting pass
    pub total_files: u64,
    /// Regular files seen by the walk
    pub scanned: u64,
    /// Files a worker finished with, successfully or not
    pub processed: u64,
    pub organized: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Idle => write!(f, "Idle"),
            ScanPhase::Counting => write!(f, "Counting"),
            ScanPhase::Processing => write!(f, "Processing"),
            ScanPhase::Completed => write!(f, "Completed"),
            ScanPhase::Aborted => write!(f, "Aborted"),
        }
    }
}
