//! Per-run mutable state.

use crate::core::organize::Placement;
use crate::core::progress::{ProgressSink, ProgressTracker};
use crate::core::scanner::MediaCategory;
use crate::events::ScanPhase;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Shared abort flag.
///
/// Cloning shares the flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Destination filenames for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResults {
    pub organized: Vec<String>,
    pub duplicates: Vec<String>,
}

/// Result query payload, concatenated across categories in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFiles {
    pub organized: Vec<String>,
    pub duplicates: Vec<String>,
}

/// State owned by exactly one run.
///
/// A fresh value is created for every scan; nothing carries over.
#[derive(Debug)]
pub struct ScanState {
    run_id: Uuid,
    cancellation: CancellationToken,
    progress: ProgressTracker,
    results: Mutex<[CategoryResults; 4]>,
    failed: AtomicUsize,
    phase: Mutex<ScanPhase>,
}

impl ScanState {
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancellation: CancellationToken::new(),
            progress: ProgressTracker::new(0, sink),
            results: Mutex::new(Default::default()),
            failed: AtomicUsize::new(0),
            phase: Mutex::new(ScanPhase::Idle),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn phase(&self) -> ScanPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_phase(&self, phase: ScanPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Counting or processing
    pub fn is_active(&self) -> bool {
        matches!(self.phase(), ScanPhase::Counting | ScanPhase::Processing)
    }

    /// Append a placed file's destination name to its category list
    pub fn record(&self, category: MediaCategory, placement: Placement, file_name: String) {
        let mut results = self.results();
        let slot = &mut results[category.index()];
        match placement {
            Placement::Original => slot.organized.push(file_name),
            Placement::Duplicate => slot.duplicates.push(file_name),
        }
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn category_results(&self, category: MediaCategory) -> CategoryResults {
        self.results()[category.index()].clone()
    }

    pub fn processed_files(&self) -> ProcessedFiles {
        let results = self.results();
        let mut files = ProcessedFiles::default();
        for slot in results.iter() {
            files.organized.extend(slot.organized.iter().cloned());
            files.duplicates.extend(slot.duplicates.iter().cloned());
        }
        files
    }

    fn results(&self) -> MutexGuard<'_, [CategoryResults; 4]> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::NullSink;

    fn state() -> ScanState {
        ScanState::new(Arc::new(NullSink))
    }

    #[test]
    fn token_stays_cancelled_and_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        token.cancel();

        assert!(clone.is_cancelled());
    }

    #[test]
    fn record_appends_to_category_list() {
        let state = state();
        state.record(MediaCategory::Audio, Placement::Original, "c.mp3".into());
        state.record(MediaCategory::PhotoVideo, Placement::Duplicate, "b.jpg".into());

        let audio = state.category_results(MediaCategory::Audio);
        assert_eq!(audio.organized, vec!["c.mp3"]);
        assert!(audio.duplicates.is_empty());

        let photos = state.category_results(MediaCategory::PhotoVideo);
        assert_eq!(photos.duplicates, vec!["b.jpg"]);
    }

    #[test]
    fn processed_files_concatenates_in_priority_order() {
        let state = state();
        state.record(MediaCategory::Archive, Placement::Original, "d.zip".into());
        state.record(MediaCategory::Audio, Placement::Original, "c.mp3".into());
        state.record(MediaCategory::PhotoVideo, Placement::Original, "a.jpg".into());

        let files = state.processed_files();
        assert_eq!(files.organized, vec!["a.jpg", "c.mp3", "d.zip"]);
        assert!(files.duplicates.is_empty());
    }

    #[test]
    fn fresh_state_is_idle_and_empty() {
        let state = state();
        assert_eq!(state.phase(), ScanPhase::Idle);
        assert!(!state.is_active());
        assert_eq!(state.processed_files(), ProcessedFiles::default());
        assert_eq!(state.failed(), 0);
    }

    #[test]
    fn each_state_has_its_own_run_id() {
        assert_ne!(state().run_id(), state().run_id());
    }
}
