//! # Error Module
//!
//! Error types for the media organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures stay local** - only tree enumeration ends a run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Fingerprint error: {0}")]
    Hash(#[from] HashError),

    #[error("Organize error: {0}")]
    Organize(#[from] OrganizeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("A scan is already in progress")]
    ScanInProgress,
}

/// Errors that occur while enumerating the source tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Scan directory has no parent to hold organized output: {path}")]
    NoParentDirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while fingerprinting a file
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File changed while hashing {path}: expected {expected} bytes, read {actual}")]
    Truncated {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Errors that occur while placing a file into its destination
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to transfer {from} to {to}: {source}")]
    Transfer {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy verification failed for {path}: source {expected} bytes, destination {actual} bytes")]
    VerificationFailed {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Path has no file name: {path}")]
    MissingFileName { path: PathBuf },
}

/// Errors in organizer settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid extension {0:?}: extensions must be non-empty")]
    InvalidExtension(String),

    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/media/inbox"),
        };
        assert!(error.to_string().contains("/media/inbox"));
    }

    #[test]
    fn truncated_error_reports_sizes() {
        let error = HashError::Truncated {
            path: PathBuf::from("/media/inbox/clip.mp4"),
            expected: 2048,
            actual: 1024,
        };
        let message = error.to_string();
        assert!(message.contains("clip.mp4"));
        assert!(message.contains("2048"));
        assert!(message.contains("1024"));
    }

    #[test]
    fn sub_errors_convert_into_top_level() {
        let error: OrganizerError = ConfigError::InvalidWorkerCount(0).into();
        assert!(matches!(error, OrganizerError::Config(_)));
        assert!(error.to_string().contains("worker count"));
    }
}
