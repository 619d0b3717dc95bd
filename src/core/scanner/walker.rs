//! Directory walking implementation using walkdir.

use super::FileEntry;
use crate::error::ScanError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Totals from the counting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCount {
    pub directories: u64,
    /// Regular files only
    pub files: u64,
}

/// Walks a source tree.
///
/// Failing to read the root is fatal. Failures below the root are
/// logged and the affected subtree is skipped. Excluded directories are
/// pruned along with everything beneath them.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    follow_symlinks: bool,
    excluded: Vec<PathBuf>,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            excluded: Vec::new(),
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Skip these directories. Paths are compared as given, so they must
    /// be spelled the same way as the root.
    pub fn exclude(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.excluded.extend(paths);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check the root exists, is a directory, and can be listed.
    pub fn verify_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| root_error(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: self.root.clone(),
            });
        }
        fs::read_dir(&self.root).map_err(|e| root_error(&self.root, e))?;
        Ok(())
    }

    /// Full traversal establishing the progress denominator.
    pub fn count(&self) -> Result<TreeCount, ScanError> {
        self.verify_root()?;

        let mut count = TreeCount::default();
        for entry_result in self.walk() {
            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        count.directories += 1;
                    } else if file_type.is_file() {
                        count.files += 1;
                    }
                }
                Err(e) => {
                    if e.depth() == 0 {
                        return Err(walk_root_error(&self.root, e));
                    }
                    warn!("Skipping unreadable entry while counting: {}", e);
                }
            }
        }

        debug!(
            directories = count.directories,
            files = count.files,
            "Counted {}",
            self.root.display()
        );
        Ok(count)
    }

    /// Lazily stream every regular file under the root.
    ///
    /// The root is read on the first call to `next`; if that fails the
    /// error is yielded and the stream ends.
    pub fn entries(
        &self,
    ) -> Result<impl Iterator<Item = Result<FileEntry, ScanError>>, ScanError> {
        self.verify_root()?;

        let root = self.root.clone();
        let mut failed = false;
        Ok(self.walk().filter_map(move |entry_result| {
            if failed {
                return None;
            }
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    failed = true;
                    return Some(Err(walk_root_error(&root, e)));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    return None;
                }
            };

            if !entry.file_type().is_file() {
                return None;
            }

            match entry.metadata() {
                Ok(metadata) => Some(Ok(FileEntry::from_metadata(entry.into_path(), &metadata))),
                Err(e) => {
                    warn!("Failed to read metadata for {}: {}", entry.path().display(), e);
                    None
                }
            }
        }))
    }

    /// Directory entries are visited in file-name order
    fn walk(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        let excluded = self.excluded.clone();
        WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                !(entry.file_type().is_dir() && excluded.iter().any(|path| path == entry.path()))
            })
    }
}

fn root_error(path: &Path, error: io::Error) -> ScanError {
    match error.kind() {
        io::ErrorKind::NotFound => ScanError::DirectoryNotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => ScanError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ScanError::ReadDirectory {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

fn walk_root_error(root: &Path, error: walkdir::Error) -> ScanError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let kind = error.io_error().map(|e| e.kind());
    match error.into_io_error() {
        Some(io_error) => root_error(&path, io_error),
        None => ScanError::ReadDirectory {
            path,
            source: io::Error::new(
                kind.unwrap_or(io::ErrorKind::Other),
                "filesystem loop detected",
            ),
        },
    }
}
