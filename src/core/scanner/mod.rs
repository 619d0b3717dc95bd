//! # Scanner Module
//!
//! Discovers files in the source tree and decides which media category
//! each one belongs to.
//!
//! ## Categories (in priority order)
//! - Photo / video
//! - Audio
//! - Container (disk images and similar)
//! - Archive
//!
//! ## Example
//! ```rust,ignore
//! use media_organizer::core::scanner::TreeWalker;
//!
//! let walker = TreeWalker::new("/Users/me/Inbox");
//! let total = walker.count()?.files;
//! for entry in walker.entries()? {
//!     println!("{}", entry?.path.display());
//! }
//! ```

mod filter;
mod walker;

pub use filter::{CategoryConfig, Classifier};
pub use walker::{TreeCount, TreeWalker};

use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A media category governing routing and enable/disable policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    PhotoVideo,
    Audio,
    Container,
    Archive,
}

impl MediaCategory {
    /// All categories, highest classification priority first.
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::PhotoVideo,
        MediaCategory::Audio,
        MediaCategory::Container,
        MediaCategory::Archive,
    ];

    /// Position in [`MediaCategory::ALL`], usable as an array index.
    pub fn index(self) -> usize {
        match self {
            MediaCategory::PhotoVideo => 0,
            MediaCategory::Audio => 1,
            MediaCategory::Container => 2,
            MediaCategory::Archive => 3,
        }
    }

    /// Directory name used under the output base path
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaCategory::PhotoVideo => "photo_video",
            MediaCategory::Audio => "audio",
            MediaCategory::Container => "container",
            MediaCategory::Archive => "archive",
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A regular file found during the walk.
///
/// Read once per file and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes at walk time
    pub size: u64,
    /// Last modified time at walk time
    pub modified: SystemTime,
}

impl FileEntry {
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        Self {
            path,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }

    /// Final path component, if it is valid UTF-8
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_priority_order() {
        for (i, category) in MediaCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(MediaCategory::ALL[0], MediaCategory::PhotoVideo);
        assert_eq!(MediaCategory::ALL[3], MediaCategory::Archive);
    }

    #[test]
    fn dir_names_match_output_layout() {
        assert_eq!(MediaCategory::PhotoVideo.dir_name(), "photo_video");
        assert_eq!(MediaCategory::Audio.to_string(), "audio");
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&MediaCategory::PhotoVideo).unwrap();
        assert_eq!(json, "\"photo_video\"");
    }

    #[test]
    fn file_entry_reads_metadata() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("song.mp3");
        std::fs::write(&path, b"abcdef").unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let entry = FileEntry::from_metadata(path.clone(), &metadata);

        assert_eq!(entry.size, 6);
        assert_eq!(entry.file_name(), Some("song.mp3"));
        assert!(entry.modified > SystemTime::UNIX_EPOCH);
    }
}
