//! # CLI Module
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! # Copy everything under ~/Inbox into dated folders beside it
//! media-organize scan ~/Inbox
//!
//! # Move instead of copy, skipping audio
//! media-organize scan ~/Inbox --operation move --no-audio
//!
//! # JSON report
//! media-organize scan ~/Inbox --output json
//!
//! # Print the effective settings
//! media-organize config
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_organizer::config::OrganizerSettings;
use media_organizer::core::hasher::FingerprintAlgorithm;
use media_organizer::core::organize::{OperationMode, ScanRequest};
use media_organizer::core::pipeline::{format_duration, ScanCoordinator, ScanReport};
use media_organizer::core::scanner::MediaCategory;
use media_organizer::error::Result;
use media_organizer::events::{
    Event, EventChannel, OrganizeEvent, PipelineEvent, ProgressBroadcaster, ScanEvent,
    ScanOutcome,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::thread;
use tracing::warn;

const SETTINGS_FILE: &str = "settings.json";

/// Media Organizer - Sort photos, music, disk images and archives by date
#[derive(Parser, Debug)]
#[command(name = "media-organize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory and organize its media beside it
    Scan {
        /// Directory to scan
        directory: PathBuf,

        /// Copy or move files into place
        #[arg(long, default_value = "copy")]
        operation: Operation,

        /// Settings file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip photos and videos
        #[arg(long)]
        no_photo_video: bool,

        /// Skip audio
        #[arg(long)]
        no_audio: bool,

        /// Skip disk images and other containers
        #[arg(long)]
        no_container: bool,

        /// Skip archives
        #[arg(long)]
        no_archive: bool,

        /// Worker threads
        #[arg(short, long)]
        workers: Option<usize>,

        /// Content fingerprint
        #[arg(long)]
        fingerprint: Option<Fingerprint>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// List every placed file
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the effective settings as JSON
    Config {
        /// Settings file (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Operation {
    /// Leave the source in place
    Copy,
    /// Remove the source once placed
    Move,
}

impl From<Operation> for OperationMode {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Copy => OperationMode::Copy,
            Operation::Move => OperationMode::Move,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Fingerprint {
    /// BLAKE3, collision resistant (default)
    Blake3,
    /// XXH3-128, faster, not collision resistant
    Xxh3,
}

impl From<Fingerprint> for FingerprintAlgorithm {
    fn from(fingerprint: Fingerprint) -> Self {
        match fingerprint {
            Fingerprint::Blake3 => FingerprintAlgorithm::Blake3,
            Fingerprint::Xxh3 => FingerprintAlgorithm::Xxh3,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON report for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            directory,
            operation,
            config,
            no_photo_video,
            no_audio,
            no_container,
            no_archive,
            workers,
            fingerprint,
            output,
            verbose,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(workers) = workers {
                settings = settings.with_workers(workers);
            }
            if let Some(fingerprint) = fingerprint {
                settings = settings.with_fingerprint(fingerprint.into());
            }
            let settings = settings.normalized()?;

            let request = ScanRequest::new(directory, operation.into())
                .with_category(MediaCategory::PhotoVideo, !no_photo_video)
                .with_category(MediaCategory::Audio, !no_audio)
                .with_category(MediaCategory::Container, !no_container)
                .with_category(MediaCategory::Archive, !no_archive);

            run_scan(settings, request, output, verbose)
        }
        Commands::Config { config } => {
            let settings = load_settings(config.as_deref())?;
            match serde_json::to_string_pretty(&settings) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize settings: {}", e),
            }
            Ok(())
        }
    }
}

/// Explicit file, else the user config file if present, else defaults
fn load_settings(path: Option<&Path>) -> Result<OrganizerSettings> {
    if let Some(path) = path {
        return Ok(OrganizerSettings::from_json_file(path)?);
    }

    let default_path = dirs::config_dir().map(|dir| dir.join("media-organizer").join(SETTINGS_FILE));
    match default_path {
        Some(path) if path.is_file() => Ok(OrganizerSettings::from_json_file(path)?),
        _ => Ok(OrganizerSettings::default()),
    }
}

fn run_scan(
    settings: OrganizerSettings,
    request: ScanRequest,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Media Organizer").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {} ({})",
            style("Scanning").dim(),
            request.scan_directory.display(),
            request.operation
        ))
        .ok();
        term.write_line("").ok();
    }

    let broadcaster = Arc::new(ProgressBroadcaster::new());
    let subscription = broadcaster.subscribe();
    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    // Percentages from the broadcaster drive the bar
    let progress_clone = progress.clone();
    let progress_thread = thread::spawn(move || {
        for percent in subscription.iter() {
            if let Some(ref pb) = progress_clone {
                pb.set_position(percent as u64);
            }
        }
    });

    // Lifecycle events drive the message
    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Scan(ScanEvent::Counted { total_files, .. }) => {
                    pb.set_message(format!("{} files", total_files));
                }
                Event::Organize(OrganizeEvent::FileFailed { path, message }) => {
                    pb.println(format!(
                        "{} {}: {}",
                        style("✗").red(),
                        path.display(),
                        message
                    ));
                }
                Event::Pipeline(PipelineEvent::Finished { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let coordinator = Arc::new(
        ScanCoordinator::new(settings)
            .with_progress_sink(broadcaster.clone())
            .with_events(sender),
    );
    if let Err(e) = ctrlc::set_handler(abort_on_interrupt(Arc::downgrade(&coordinator))) {
        warn!("Ctrl-C will not abort the scan: {}", e);
    }
    let result = coordinator.scan_and_organize_files(request);

    // Dropping the coordinator and broadcaster closes both channels
    drop(coordinator);
    drop(broadcaster);
    event_thread.join().ok();
    progress_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;
    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, verbose),
        OutputFormat::Json => print_json_report(&report),
    }

    Ok(())
}

/// The handler outlives the run, so it only holds a weak reference
fn abort_on_interrupt(coordinator: Weak<ScanCoordinator>) -> impl Fn() + Send + Sync + 'static {
    move || {
        if let Some(coordinator) = coordinator.upgrade() {
            coordinator.abort_scan();
        }
    }
}

fn print_pretty_report(term: &Term, report: &ScanReport, verbose: bool) {
    let headline = match report.outcome {
        ScanOutcome::Completed => format!("{} Scan Complete", style("✓").green().bold()),
        ScanOutcome::Aborted => format!("{} Scan Aborted", style("!").yellow().bold()),
    };
    term.write_line(&headline).ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {}",
        style(report.scanned).cyan(),
        format_duration(report.duration_ms)
    ))
    .ok();
    term.write_line(&format!(
        "  {} organized, {} duplicates",
        style(report.files.organized.len()).cyan(),
        style(report.files.duplicates.len()).yellow()
    ))
    .ok();
    if report.failed > 0 {
        term.write_line(&format!("  {} failed", style(report.failed).red()))
            .ok();
    }
    if report.timed_out {
        term.write_line(&format!(
            "  {}",
            style("Stopped waiting for workers; some files may be unreported").yellow()
        ))
        .ok();
    }
    term.write_line("").ok();

    for summary in &report.per_category {
        if summary.organized == 0 && summary.duplicates == 0 {
            continue;
        }
        term.write_line(&format!(
            "  {:<12} {} organized, {} duplicates",
            style(summary.category).bold(),
            summary.organized,
            summary.duplicates
        ))
        .ok();
    }

    if verbose {
        term.write_line("").ok();
        for name in &report.files.organized {
            term.write_line(&format!("    {} {}", style("★").green(), name))
                .ok();
        }
        for name in &report.files.duplicates {
            term.write_line(&format!("    {} {}", style("○").dim(), name))
                .ok();
        }
    }
}

fn print_json_report(report: &ScanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}
