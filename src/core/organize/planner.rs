//! Destination planning for originals and duplicates.

use crate::core::scanner::{CategoryConfig, FileEntry};
use crate::error::OrganizeError;
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;
use std::time::SystemTime;

/// Computes where a file should land
pub struct DestinationPlanner;

impl DestinationPlanner {
    /// Year folder and month bucket for a date.
    ///
    /// 2024-03-15 becomes `("2024", "2024-03 March")`.
    pub fn bucket(date: NaiveDate) -> (String, String) {
        let year = date.format("%Y").to_string();
        let month_folder = date.format("%Y-%m %B").to_string();
        (year, month_folder)
    }

    /// Modification time as a calendar date in the local time zone
    pub fn local_date(modified: SystemTime) -> NaiveDate {
        DateTime::<Local>::from(modified).date_naive()
    }

    /// `organized_root/YYYY/YYYY-MM MonthName/<file name>`
    pub fn original_destination(
        entry: &FileEntry,
        config: &CategoryConfig,
    ) -> Result<PathBuf, OrganizeError> {
        let file_name = Self::file_name(entry)?;
        let (year, month_folder) = Self::bucket(Self::local_date(entry.modified));

        Ok(config
            .organized_root
            .join(year)
            .join(month_folder)
            .join(file_name))
    }

    /// `duplicates_root/<file name>`, no date bucketing
    pub fn duplicate_destination(
        entry: &FileEntry,
        config: &CategoryConfig,
    ) -> Result<PathBuf, OrganizeError> {
        let file_name = Self::file_name(entry)?;
        Ok(config.duplicates_root.join(file_name))
    }

    fn file_name(entry: &FileEntry) -> Result<&std::ffi::OsStr, OrganizeError> {
        entry
            .path
            .file_name()
            .ok_or_else(|| OrganizeError::MissingFileName {
                path: entry.path.clone(),
            })
    }
}
