//! Types for the organize module.

use crate::core::scanner::MediaCategory;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Operation mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Copy files to destination (keep originals)
    #[default]
    Copy,
    /// Move files to destination
    Move,
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationMode::Copy => write!(f, "copy"),
            OperationMode::Move => write!(f, "move"),
        }
    }
}

/// A request to scan and organize one directory.
///
/// Immutable once a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub scan_directory: PathBuf,
    pub operation: OperationMode,
    pub photo_video_enabled: bool,
    pub audio_enabled: bool,
    pub container_enabled: bool,
    pub archive_enabled: bool,
}

impl ScanRequest {
    /// A request with every category enabled
    pub fn new(scan_directory: impl Into<PathBuf>, operation: OperationMode) -> Self {
        Self {
            scan_directory: scan_directory.into(),
            operation,
            photo_video_enabled: true,
            audio_enabled: true,
            container_enabled: true,
            archive_enabled: true,
        }
    }

    pub fn with_category(mut self, category: MediaCategory, enabled: bool) -> Self {
        match category {
            MediaCategory::PhotoVideo => self.photo_video_enabled = enabled,
            MediaCategory::Audio => self.audio_enabled = enabled,
            MediaCategory::Container => self.container_enabled = enabled,
            MediaCategory::Archive => self.archive_enabled = enabled,
        }
        self
    }

    pub fn is_enabled(&self, category: MediaCategory) -> bool {
        match category {
            MediaCategory::PhotoVideo => self.photo_video_enabled,
            MediaCategory::Audio => self.audio_enabled,
            MediaCategory::Container => self.container_enabled,
            MediaCategory::Archive => self.archive_enabled,
        }
    }
}

/// Whether a file was the first of its content or a repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Original,
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_from_camel_case() {
        let json = r#"{
            "scanDirectory": "/media/inbox",
            "operation": "move",
            "photoVideoEnabled": true,
            "audioEnabled": false,
            "containerEnabled": true,
            "archiveEnabled": false
        }"#;

        let request: ScanRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.operation, OperationMode::Move);
        assert!(request.is_enabled(MediaCategory::PhotoVideo));
        assert!(!request.is_enabled(MediaCategory::Audio));
        assert!(!request.is_enabled(MediaCategory::Archive));
    }

    #[test]
    fn with_category_toggles_one_flag() {
        let request = ScanRequest::new("/media/inbox", OperationMode::Copy)
            .with_category(MediaCategory::Container, false);

        assert!(request.is_enabled(MediaCategory::PhotoVideo));
        assert!(request.is_enabled(MediaCategory::Audio));
        assert!(!request.is_enabled(MediaCategory::Container));
        assert!(request.is_enabled(MediaCategory::Archive));
    }
}
