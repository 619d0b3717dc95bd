//! Entry point for scan requests, result queries, and aborts.

use super::executor::{ScanReport, ScanRun};
use super::state::{ProcessedFiles, ScanState};
use crate::config::OrganizerSettings;
use crate::core::organize::ScanRequest;
use crate::core::progress::{NullSink, ProgressSink};
use crate::error::{OrganizerError, Result};
use crate::events::{null_sender, EventSender, ScanPhase};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Runs one scan at a time and keeps the latest run's state for queries.
///
/// Every request starts from a fresh [`ScanState`]; results from an
/// earlier run stay queryable only until the next one begins.
pub struct ScanCoordinator {
    settings: OrganizerSettings,
    sink: Arc<dyn ProgressSink>,
    events: EventSender,
    current: Mutex<Option<Arc<ScanState>>>,
}

impl ScanCoordinator {
    pub fn new(settings: OrganizerSettings) -> Self {
        Self {
            settings,
            sink: Arc::new(NullSink),
            events: null_sender(),
            current: Mutex::new(None),
        }
    }

    /// Where progress percentages go
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Where lifecycle events go
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    pub fn settings(&self) -> &OrganizerSettings {
        &self.settings
    }

    /// Scan, classify, deduplicate and organize `request.scan_directory`.
    ///
    /// Blocks until the run completes or aborts. Fails with
    /// [`OrganizerError::ScanInProgress`] if another run is active.
    pub fn scan_and_organize_files(&self, request: ScanRequest) -> Result<ScanReport> {
        let run = {
            let mut current = self.current();
            if current.as_ref().is_some_and(|state| state.is_active()) {
                return Err(OrganizerError::ScanInProgress);
            }
            let run = ScanRun::new(request, self.settings.clone(), Arc::clone(&self.sink))
                .with_events(self.events.clone());
            let state = run.state();
            // Claim the slot before releasing the lock
            state.set_phase(ScanPhase::Counting);
            *current = Some(state);
            run
        };

        run.execute()
    }

    /// Organized and duplicate filenames of the latest run
    pub fn processed_files(&self) -> ProcessedFiles {
        self.current()
            .as_ref()
            .map(|state| state.processed_files())
            .unwrap_or_default()
    }

    /// Stop dispatching new files. Safe to call at any time, any number of times.
    pub fn abort_scan(&self) {
        match self.current().as_ref() {
            Some(state) if state.is_active() => {
                warn!(run_id = %state.run_id(), "Aborting scan");
                state.cancellation().cancel();
            }
            _ => info!("Abort requested with no active scan"),
        }
    }

    /// Phase of the active run, or `Idle`
    pub fn phase(&self) -> ScanPhase {
        match self.current().as_ref() {
            Some(state) if state.is_active() => state.phase(),
            _ => ScanPhase::Idle,
        }
    }

    /// State of the latest run, if any
    pub fn current_state(&self) -> Option<Arc<ScanState>> {
        self.current().clone()
    }

    fn current(&self) -> MutexGuard<'_, Option<Arc<ScanState>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::organize::OperationMode;
    use std::fs;
    use tempfile::TempDir;

    fn coordinator() -> ScanCoordinator {
        ScanCoordinator::new(OrganizerSettings::default().with_workers(2))
    }

    #[test]
    fn idle_before_any_run() {
        let coordinator = coordinator();
        assert_eq!(coordinator.phase(), ScanPhase::Idle);
        assert_eq!(coordinator.processed_files(), ProcessedFiles::default());
        assert!(coordinator.current_state().is_none());
    }

    #[test]
    fn abort_without_run_is_a_no_op() {
        let coordinator = coordinator();
        coordinator.abort_scan();
        coordinator.abort_scan();
        assert_eq!(coordinator.phase(), ScanPhase::Idle);
    }

    #[test]
    fn finished_run_returns_to_idle_and_keeps_results() {
        let temp = TempDir::new().unwrap();
        let inbox = temp.path().join("inbox");
        fs::create_dir(&inbox).unwrap();
        fs::write(inbox.join("a.jpg"), b"pixels").unwrap();

        let coordinator = coordinator();
        let report = coordinator
            .scan_and_organize_files(ScanRequest::new(&inbox, OperationMode::Copy))
            .unwrap();

        assert_eq!(report.files.organized, vec!["a.jpg"]);
        assert_eq!(coordinator.phase(), ScanPhase::Idle);
        assert_eq!(coordinator.processed_files().organized, vec!["a.jpg"]);
        assert_eq!(
            coordinator.current_state().unwrap().phase(),
            ScanPhase::Completed
        );
    }

    #[test]
    fn active_run_rejects_a_second_request() {
        let temp = TempDir::new().unwrap();
        let coordinator = coordinator();

        // Simulate a run in flight
        let state = Arc::new(ScanState::new(Arc::new(NullSink)));
        state.set_phase(ScanPhase::Processing);
        *coordinator.current() = Some(Arc::clone(&state));

        let result =
            coordinator.scan_and_organize_files(ScanRequest::new(temp.path(), OperationMode::Copy));
        assert!(matches!(result, Err(OrganizerError::ScanInProgress)));

        coordinator.abort_scan();
        assert!(state.cancellation().is_cancelled());
    }

    #[test]
    fn failed_run_leaves_coordinator_idle() {
        let temp = TempDir::new().unwrap();
        let coordinator = coordinator();

        let result = coordinator.scan_and_organize_files(ScanRequest::new(
            temp.path().join("missing"),
            OperationMode::Copy,
        ));

        assert!(result.is_err());
        assert_eq!(coordinator.phase(), ScanPhase::Idle);
    }
}
