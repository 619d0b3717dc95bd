//! # Config Module
//!
//! Settings that stay fixed across runs: which suffixes belong to which
//! category, how many workers to run, how long to wait for stragglers,
//! and which fingerprint function to use.
//!
//! Settings can be loaded from a JSON file; missing keys fall back to
//! the defaults below.
//!
//! ```json
//! {
//!   "audio_extensions": [".mp3", ".flac"],
//!   "workers": 4,
//!   "fingerprint": "xxh3"
//! }
//! ```

use crate::core::hasher::FingerprintAlgorithm;
use crate::core::scanner::MediaCategory;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_PHOTO_VIDEO: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff", ".tif", ".heic", ".heif", ".raw",
    ".cr2", ".nef", ".dng", ".arw", ".raf", ".mp4", ".mov", ".avi", ".mkv", ".wmv", ".webm",
    ".m4v", ".3gp", ".mts",
];

const DEFAULT_AUDIO: &[&str] = &[
    ".mp3", ".wav", ".flac", ".aac", ".ogg", ".oga", ".m4a", ".wma", ".aiff", ".opus",
];

const DEFAULT_CONTAINER: &[&str] = &[".iso", ".img", ".dmg", ".vhd", ".vhdx", ".vmdk", ".cue"];

const DEFAULT_ARCHIVE: &[&str] = &[
    ".zip", ".rar", ".7z", ".tar", ".gz", ".tgz", ".bz2", ".xz", ".zst",
];

/// One day
const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 24 * 60 * 60 * 1000;

/// Organizer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrganizerSettings {
    pub photo_video_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub container_extensions: Vec<String>,
    pub archive_extensions: Vec<String>,
    /// Worker threads (None = available parallelism minus one, at least 1)
    pub workers: Option<usize>,
    /// Milliseconds to wait for outstanding tasks once dispatch stops
    pub shutdown_timeout_ms: u64,
    pub fingerprint: FingerprintAlgorithm,
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            photo_video_extensions: owned(DEFAULT_PHOTO_VIDEO),
            audio_extensions: owned(DEFAULT_AUDIO),
            container_extensions: owned(DEFAULT_CONTAINER),
            archive_extensions: owned(DEFAULT_ARCHIVE),
            workers: None,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
            fingerprint: FingerprintAlgorithm::default(),
        }
    }
}

impl OrganizerSettings {
    /// Load settings from a JSON file, then normalize and validate them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.normalized()
    }

    /// Lowercase every extension and give it a leading dot.
    ///
    /// Fails on empty extensions and on a zero worker count.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        for list in [
            &mut self.photo_video_extensions,
            &mut self.audio_extensions,
            &mut self.container_extensions,
            &mut self.archive_extensions,
        ] {
            for ext in list.iter_mut() {
                *ext = normalize_extension(ext)?;
            }
        }

        if let Some(0) = self.workers {
            return Err(ConfigError::InvalidWorkerCount(0));
        }

        Ok(self)
    }

    /// Configured suffixes for a category
    pub fn extensions_for(&self, category: MediaCategory) -> &[String] {
        match category {
            MediaCategory::PhotoVideo => &self.photo_video_extensions,
            MediaCategory::Audio => &self.audio_extensions,
            MediaCategory::Container => &self.container_extensions,
            MediaCategory::Archive => &self.archive_extensions,
        }
    }

    /// Worker pool size for a run
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_worker_count).max(1)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: FingerprintAlgorithm) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Leave one core for the walking thread.
fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

fn normalize_extension(ext: &str) -> Result<String, ConfigError> {
    let trimmed = ext.trim().to_lowercase();
    if trimmed.is_empty() || trimmed == "." {
        return Err(ConfigError::InvalidExtension(ext.to_string()));
    }
    if trimmed.starts_with('.') {
        Ok(trimmed)
    } else {
        Ok(format!(".{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_every_category() {
        let settings = OrganizerSettings::default();
        for category in MediaCategory::ALL {
            assert!(!settings.extensions_for(category).is_empty());
        }
        assert!(settings.worker_count() >= 1);
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(86_400));
    }

    #[test]
    fn shutdown_timeout_keeps_sub_second_precision() {
        let settings =
            OrganizerSettings::default().with_shutdown_timeout(Duration::from_millis(250));
        assert_eq!(settings.shutdown_timeout(), Duration::from_millis(250));
        assert_eq!(settings.shutdown_timeout_ms, 250);

        let settings = settings.with_shutdown_timeout(Duration::from_millis(1500));
        assert_eq!(settings.shutdown_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn normalize_adds_dot_and_lowercases() {
        let settings = OrganizerSettings {
            audio_extensions: vec!["MP3".to_string(), " .Flac ".to_string()],
            ..Default::default()
        }
        .normalized()
        .unwrap();

        assert_eq!(settings.audio_extensions, vec![".mp3", ".flac"]);
    }

    #[test]
    fn normalize_rejects_empty_extension() {
        let settings = OrganizerSettings {
            archive_extensions: vec!["".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            settings.normalized(),
            Err(ConfigError::InvalidExtension(_))
        ));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let settings = OrganizerSettings::default().with_workers(0);
        assert!(matches!(
            settings.normalized(),
            Err(ConfigError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn loads_partial_json_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "audio_extensions": ["ogg"], "workers": 3, "fingerprint": "xxh3" }}"#
        )
        .unwrap();

        let settings = OrganizerSettings::from_json_file(file.path()).unwrap();

        assert_eq!(settings.audio_extensions, vec![".ogg"]);
        assert_eq!(settings.worker_count(), 3);
        assert_eq!(settings.fingerprint, FingerprintAlgorithm::Xxh3);
        assert_eq!(
            settings.photo_video_extensions,
            OrganizerSettings::default().photo_video_extensions
        );
    }

    #[test]
    fn malformed_json_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let error = OrganizerSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
