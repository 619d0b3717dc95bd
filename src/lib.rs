//! # Media Organizer
//!
//! Sorts a directory of media into dated folders and sets duplicates aside.
//!
//! ## What a run does
//! - **Classify** - Photo/video, audio, container or archive, by extension
//! - **Fingerprint** - Hash every byte, so only identical files match
//! - **Deduplicate** - The first file with given content is the original
//! - **Organize** - Originals go to `<category>/organized/YYYY/YYYY-MM Month`,
//!   duplicates to `<category>/duplicates`, both beside the scanned directory
//!
//! ## Architecture
//! - `core` - The scan/organize engine
//! - `events` - Lifecycle events and progress broadcasting
//! - `config` - Extension lists and run settings
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

fn subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish()
}

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    tracing::subscriber::set_global_default(subscriber())
        .expect("Failed to set global default tracing subscriber");
}

/// Like [`init_tracing`], but returns false if a subscriber is already set
pub fn try_init_tracing() -> bool {
    tracing::subscriber::set_global_default(subscriber()).is_ok()
}
