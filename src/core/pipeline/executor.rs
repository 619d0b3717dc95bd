//! A single scan-and-organize run.

use super::state::{CancellationToken, ProcessedFiles, ScanState};
use crate::config::OrganizerSettings;
use crate::core::dedup::DedupIndex;
use crate::core::hasher::{ContentHasher, HasherConfig};
use crate::core::organize::{DestinationPlanner, Organizer, Placement, ScanRequest};
use crate::core::progress::ProgressSink;
use crate::core::scanner::{CategoryConfig, Classifier, FileEntry, MediaCategory, TreeWalker};
use crate::error::{OrganizerError, Result, ScanError};
use crate::events::{
    null_sender, Event, EventSender, OrganizeEvent, PipelineEvent, RunSummary, ScanEvent,
    ScanOutcome, ScanPhase,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome counts for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: MediaCategory,
    pub organized: usize,
    pub duplicates: usize,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub run_id: Uuid,
    pub outcome: ScanOutcome,
    /// Regular files found by the counting pass
    pub total_files: u64,
    pub scanned: u64,
    /// Files handed to the worker pool
    pub dispatched: u64,
    pub processed: u64,
    /// Files that could not be hashed or placed
    pub failed: usize,
    pub files: ProcessedFiles,
    pub per_category: Vec<CategorySummary>,
    pub duration_ms: u64,
    /// Outstanding tasks were abandoned at the shutdown timeout
    pub timed_out: bool,
}

impl ScanReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            outcome: self.outcome,
            total_files: self.total_files,
            scanned: self.scanned,
            processed: self.processed,
            organized: self.files.organized.len(),
            duplicates: self.files.duplicates.len(),
            failed: self.failed,
            duration_ms: self.duration_ms,
        }
    }

    pub fn category(&self, category: MediaCategory) -> Option<&CategorySummary> {
        self.per_category.iter().find(|c| c.category == category)
    }
}

/// Format milliseconds as `HHh:MMm:SSs.mmmms`
pub fn format_duration(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{:02}h:{:02}m:{:02}s.{:03}ms", hours, minutes, seconds, millis)
}

/// Shared by every task of one run
struct WorkerContext {
    state: Arc<ScanState>,
    hasher: Box<dyn ContentHasher>,
    dedup: DedupIndex,
    organizer: Organizer,
    events: EventSender,
    /// Set when the driver stops waiting; queued tasks become no-ops
    abandoned: AtomicBool,
}

/// Signals the driver when a task ends, including by panic
struct CompletionGuard(Sender<()>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

/// One run: count, walk, dispatch to the worker pool, wait, report.
pub struct ScanRun {
    request: ScanRequest,
    settings: OrganizerSettings,
    state: Arc<ScanState>,
    events: EventSender,
}

impl ScanRun {
    pub fn new(request: ScanRequest, settings: OrganizerSettings, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            request,
            settings,
            state: Arc::new(ScanState::new(sink)),
            events: null_sender(),
        }
    }

    /// Send lifecycle events to `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    /// Live view of this run's state
    pub fn state(&self) -> Arc<ScanState> {
        Arc::clone(&self.state)
    }

    /// Handle that aborts this run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.state.cancellation().clone()
    }

    /// Blocks until the run completes or aborts.
    ///
    /// Only failures to enumerate the source tree or to start the pool
    /// are returned as errors; per-file failures are counted instead.
    pub fn execute(self) -> Result<ScanReport> {
        let started = Instant::now();
        match self.run(started) {
            Ok(report) => Ok(report),
            Err(e) => {
                error!("Scan of {} failed: {}", self.request.scan_directory.display(), e);
                self.events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                self.state.set_phase(ScanPhase::Idle);
                Err(e)
            }
        }
    }

    fn run(&self, started: Instant) -> Result<ScanReport> {
        let walker = TreeWalker::new(&self.request.scan_directory);
        walker.verify_root()?;

        let root = self
            .request
            .scan_directory
            .canonicalize()
            .map_err(|source| ScanError::ReadDirectory {
                path: self.request.scan_directory.clone(),
                source,
            })?;
        let request = ScanRequest {
            scan_directory: root.clone(),
            ..self.request.clone()
        };
        let classifier = Classifier::for_request(&request, &self.settings)?;
        // Output roots may sit inside the scanned tree
        let walker = TreeWalker::new(&root).exclude(classifier.output_roots());

        info!(
            run_id = %self.state.run_id(),
            operation = %request.operation,
            "Scanning {}",
            root.display()
        );
        self.events.send(Event::Pipeline(PipelineEvent::Started {
            run_id: self.state.run_id(),
            directory: root.clone(),
        }));

        self.enter(ScanPhase::Counting);
        let count = walker.count()?;
        self.state.progress().set_total_files(count.files);
        self.events.send(Event::Scan(ScanEvent::Counted {
            total_files: count.files,
            directories: count.directories,
        }));

        self.enter(ScanPhase::Processing);
        let workers = self.settings.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("organizer-worker-{}", i))
            .panic_handler(|_| error!("Organizer worker panicked"))
            .build()
            .map_err(|e| OrganizerError::WorkerPool(e.to_string()))?;
        debug!(workers, "Worker pool ready");

        let context = Arc::new(WorkerContext {
            state: Arc::clone(&self.state),
            hasher: HasherConfig::new()
                .algorithm(self.settings.fingerprint)
                .build(),
            dedup: DedupIndex::new(),
            organizer: Organizer::new(request.operation),
            events: self.events.clone(),
            abandoned: AtomicBool::new(false),
        });

        let (done_tx, done_rx) = unbounded();
        let mut dispatched = 0usize;
        let cancellation = self.state.cancellation();

        for entry in walker.entries()? {
            // A root failure arrives before any file is dispatched
            let entry = entry?;
            if cancellation.is_cancelled() {
                warn!("Abort requested, no further files will be dispatched");
                break;
            }
            self.state.progress().record_scanned();

            let Some(config) = classifier.classify_path(&entry.path).cloned() else {
                debug!("Skipping {}", entry.path.display());
                continue;
            };

            let context = Arc::clone(&context);
            let guard = CompletionGuard(done_tx.clone());
            pool.spawn(move || {
                let _guard = guard;
                process_file(&context, entry, &config);
            });
            dispatched += 1;
        }
        drop(done_tx);

        let timed_out = !wait_for_tasks(&done_rx, dispatched, self.settings.shutdown_timeout());
        if timed_out {
            warn!(
                "Forcing shutdown as tasks did not finish within {:?}",
                self.settings.shutdown_timeout()
            );
            context.abandoned.store(true, Ordering::SeqCst);
        }

        let outcome = if cancellation.is_cancelled() {
            ScanOutcome::Aborted
        } else {
            ScanOutcome::Completed
        };

        self.state.progress().finish();
        self.enter(match outcome {
            ScanOutcome::Completed => ScanPhase::Completed,
            ScanOutcome::Aborted => ScanPhase::Aborted,
        });

        let duration_ms = started.elapsed().as_millis() as u64;
        let report = self.report(outcome, dispatched as u64, duration_ms, timed_out);

        info!(
            "Completed processing {} files in {} -> {}%",
            report.processed,
            format_duration(duration_ms),
            self.state.progress().last_emitted()
        );
        self.events.send(Event::Pipeline(PipelineEvent::Finished {
            summary: report.summary(),
        }));

        Ok(report)
    }

    fn enter(&self, phase: ScanPhase) {
        self.state.set_phase(phase);
        self.events
            .send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    fn report(
        &self,
        outcome: ScanOutcome,
        dispatched: u64,
        duration_ms: u64,
        timed_out: bool,
    ) -> ScanReport {
        let progress = self.state.progress();
        let per_category = MediaCategory::ALL
            .iter()
            .map(|&category| {
                let results = self.state.category_results(category);
                CategorySummary {
                    category,
                    organized: results.organized.len(),
                    duplicates: results.duplicates.len(),
                }
            })
            .collect();

        ScanReport {
            run_id: self.state.run_id(),
            outcome,
            total_files: progress.total_files(),
            scanned: progress.scanned(),
            dispatched,
            processed: progress.processed(),
            failed: self.state.failed(),
            files: self.state.processed_files(),
            per_category,
            duration_ms,
            timed_out,
        }
    }
}

/// Wait for `expected` completions. Returns false if the timeout elapsed first.
fn wait_for_tasks(done: &Receiver<()>, expected: usize, timeout: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    let mut finished = 0;
    while finished < expected {
        let received = match deadline {
            Some(deadline) => done.recv_deadline(deadline).is_ok(),
            None => done.recv().is_ok(),
        };
        if !received {
            return false;
        }
        finished += 1;
    }
    true
}

fn process_file(context: &WorkerContext, entry: FileEntry, config: &CategoryConfig) {
    let state = &context.state;
    if state.cancellation().is_cancelled() || context.abandoned.load(Ordering::SeqCst) {
        debug!("Not starting {}", entry.path.display());
        return;
    }

    let started = Instant::now();
    match organize_file(context, &entry, config) {
        Ok((destination, placement)) => {
            let file_name = destination
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            state.record(config.category, placement, file_name.clone());
            state.progress().record_processed();

            info!(
                "Processed {} in {} ms -> {}%",
                file_name,
                started.elapsed().as_millis(),
                state.progress().current_percent()
            );
            context
                .events
                .send(Event::Organize(OrganizeEvent::FileOrganized {
                    path: entry.path,
                    destination,
                    category: config.category,
                    placement,
                }));
        }
        Err(e) => {
            error!("Failed to organize {}: {}", entry.path.display(), e);
            state.record_failure();
            state.progress().record_processed();
            context.events.send(Event::Organize(OrganizeEvent::FileFailed {
                path: entry.path,
                message: e.to_string(),
            }));
        }
    }
}

/// Hash, decide, place. The dedup decision is made against the planned
/// original destination so the index always names where the original lives.
fn organize_file(
    context: &WorkerContext,
    entry: &FileEntry,
    config: &CategoryConfig,
) -> Result<(PathBuf, Placement)> {
    let fingerprint = context.hasher.hash_file(entry)?;
    let planned = DestinationPlanner::original_destination(entry, config)?;

    match context.dedup.resolve(&fingerprint, &planned) {
        Placement::Original => {
            if let Err(e) = context.organizer.place_at(entry, &planned) {
                context.dedup.release(&fingerprint, &planned);
                return Err(e.into());
            }
            Ok((planned, Placement::Original))
        }
        Placement::Duplicate => {
            let destination = context.organizer.place_duplicate(entry, config)?;
            Ok((destination, Placement::Duplicate))
        }
    }
}
