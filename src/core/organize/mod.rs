//! File organization module.
//!
//! Places originals into `year/YYYY-MM MonthName` buckets under their
//! category's organized root, and duplicates flat under the category's
//! duplicates root, by copying or moving.

mod executor;
mod planner;
mod types;

pub use executor::TransferExecutor;
pub use planner::DestinationPlanner;
pub use types::*;

use crate::core::scanner::{CategoryConfig, FileEntry};
use crate::error::OrganizeError;
use std::path::{Path, PathBuf};

/// Plans and performs placements for one operation mode
#[derive(Debug, Clone, Copy)]
pub struct Organizer {
    executor: TransferExecutor,
}

impl Organizer {
    pub fn new(operation: OperationMode) -> Self {
        Self {
            executor: TransferExecutor::new(operation),
        }
    }

    pub fn operation(&self) -> OperationMode {
        self.executor.operation()
    }

    /// Place a file into its date bucket, returning the destination
    pub fn place_original(
        &self,
        entry: &FileEntry,
        config: &CategoryConfig,
    ) -> Result<PathBuf, OrganizeError> {
        let destination = DestinationPlanner::original_destination(entry, config)?;
        self.place_at(entry, &destination)?;
        Ok(destination)
    }

    /// Place a file into the flat duplicates folder, returning the destination
    pub fn place_duplicate(
        &self,
        entry: &FileEntry,
        config: &CategoryConfig,
    ) -> Result<PathBuf, OrganizeError> {
        let destination = DestinationPlanner::duplicate_destination(entry, config)?;
        self.place_at(entry, &destination)?;
        Ok(destination)
    }

    /// Transfer to an already planned destination
    pub fn place_at(&self, entry: &FileEntry, destination: &Path) -> Result<(), OrganizeError> {
        self.executor.transfer(&entry.path, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::MediaCategory;
    use chrono::{Local, TimeZone};
    use std::fs;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn setup(content: &[u8]) -> (TempDir, FileEntry, CategoryConfig) {
        let temp = TempDir::new().unwrap();
        let inbox = temp.path().join("inbox");
        fs::create_dir(&inbox).unwrap();
        let path = inbox.join("beach.jpg");
        fs::write(&path, content).unwrap();

        let modified: SystemTime = Local
            .with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
            .single()
            .unwrap()
            .into();
        let entry = FileEntry {
            path,
            size: content.len() as u64,
            modified,
        };
        let config = CategoryConfig::under(
            temp.path(),
            MediaCategory::PhotoVideo,
            vec![".jpg".to_string()],
            true,
        );
        (temp, entry, config)
    }

    #[test]
    fn place_original_copies_into_bucket() {
        let (temp, entry, config) = setup(b"sand");

        let destination = Organizer::new(OperationMode::Copy)
            .place_original(&entry, &config)
            .unwrap();

        assert_eq!(
            destination,
            temp.path()
                .join("photo_video/organized/2024/2024-03 March/beach.jpg")
        );
        assert!(destination.exists());
        assert!(entry.path.exists());
    }

    #[test]
    fn place_duplicate_moves_flat() {
        let (temp, entry, config) = setup(b"sand");

        let destination = Organizer::new(OperationMode::Move)
            .place_duplicate(&entry, &config)
            .unwrap();

        assert_eq!(
            destination,
            temp.path().join("photo_video/duplicates/beach.jpg")
        );
        assert!(destination.exists());
        assert!(!entry.path.exists());
    }
}
