//! Category classification for scanned files.

use super::MediaCategory;
use crate::config::OrganizerSettings;
use crate::core::organize::ScanRequest;
use crate::error::ScanError;
use std::path::{Path, PathBuf};

const ORGANIZED_DIRECTORY: &str = "organized";
const DUPLICATES_DIRECTORY: &str = "duplicates";

/// Routing and policy for one category within a run
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    pub category: MediaCategory,
    /// Lowercase filename suffixes, e.g. `.jpg`
    pub extensions: Vec<String>,
    /// Root of the date-bucketed tree for originals
    pub organized_root: PathBuf,
    /// Flat folder for duplicates
    pub duplicates_root: PathBuf,
    pub enabled: bool,
}

impl CategoryConfig {
    /// Build the config for `category` with output roots under `base`.
    pub fn under(base: &Path, category: MediaCategory, extensions: Vec<String>, enabled: bool) -> Self {
        let category_root = base.join(category.dir_name());
        Self {
            category,
            extensions,
            organized_root: category_root.join(ORGANIZED_DIRECTORY),
            duplicates_root: category_root.join(DUPLICATES_DIRECTORY),
            enabled,
        }
    }

    fn matches(&self, lowercase_name: &str) -> bool {
        self.enabled
            && self
                .extensions
                .iter()
                .any(|ext| lowercase_name.ends_with(ext.as_str()))
    }
}

/// Maps filenames to the first enabled matching category.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Always sorted by category priority
    categories: Vec<CategoryConfig>,
}

impl Classifier {
    pub fn new(mut categories: Vec<CategoryConfig>) -> Self {
        categories.sort_by_key(|c| c.category.index());
        Self { categories }
    }

    /// Derive the per-run category set.
    ///
    /// Output roots live beside the scanned directory, under its parent.
    pub fn for_request(
        request: &ScanRequest,
        settings: &OrganizerSettings,
    ) -> Result<Self, ScanError> {
        let base = request
            .scan_directory
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ScanError::NoParentDirectory {
                path: request.scan_directory.clone(),
            })?;

        let categories = MediaCategory::ALL
            .iter()
            .map(|&category| {
                CategoryConfig::under(
                    base,
                    category,
                    settings.extensions_for(category).to_vec(),
                    request.is_enabled(category),
                )
            })
            .collect();

        Ok(Self::new(categories))
    }

    /// Classify by filename. Matching is a case-insensitive suffix test.
    pub fn classify(&self, file_name: &str) -> Option<&CategoryConfig> {
        let lowercase = file_name.to_lowercase();
        self.categories.iter().find(|c| c.matches(&lowercase))
    }

    /// Names that are not valid UTF-8 are matched on their lossy form.
    pub fn classify_path(&self, path: &Path) -> Option<&CategoryConfig> {
        path.file_name()
            .and_then(|name| self.classify(&name.to_string_lossy()))
    }

    pub fn config(&self, category: MediaCategory) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn categories(&self) -> &[CategoryConfig] {
        &self.categories
    }

    /// Every organized and duplicates root, enabled or not
    pub fn output_roots(&self) -> Vec<PathBuf> {
        self.categories
            .iter()
            .flat_map(|c| [c.organized_root.clone(), c.duplicates_root.clone()])
            .collect()
    }
}
