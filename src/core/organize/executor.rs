//! Copy/move execution.

use super::types::OperationMode;
use crate::error::OrganizeError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Transfers one file, creating the destination directory first.
///
/// An existing file at the destination is overwritten. A destination
/// that already is the source file counts as placed.
#[derive(Debug, Clone, Copy)]
pub struct TransferExecutor {
    operation: OperationMode,
}

impl TransferExecutor {
    pub fn new(operation: OperationMode) -> Self {
        Self { operation }
    }

    pub fn operation(&self) -> OperationMode {
        self.operation
    }

    pub fn transfer(&self, source: &Path, destination: &Path) -> Result<(), OrganizeError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| OrganizeError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if is_same_file(source, destination) {
            debug!("{} is already in place", source.display());
            return Ok(());
        }

        match self.operation {
            OperationMode::Copy => fs::copy(source, destination)
                .map(|_| ())
                .map_err(|e| transfer_error(source, destination, e)),
            OperationMode::Move => Self::move_file(source, destination),
        }
    }

    fn move_file(source: &Path, destination: &Path) -> Result<(), OrganizeError> {
        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(rename_error) => {
                // rename fails across filesystems, fall back to copy+delete
                debug!(
                    "rename {} failed ({}), copying instead",
                    source.display(),
                    rename_error
                );

                let source_size = fs::metadata(source)
                    .map_err(|e| transfer_error(source, destination, e))?
                    .len();
                fs::copy(source, destination).map_err(|e| transfer_error(source, destination, e))?;

                let dest_size = fs::metadata(destination)
                    .map_err(|e| transfer_error(source, destination, e))?
                    .len();
                if dest_size != source_size {
                    let _ = fs::remove_file(destination);
                    return Err(OrganizeError::VerificationFailed {
                        path: source.to_path_buf(),
                        expected: source_size,
                        actual: dest_size,
                    });
                }

                fs::remove_file(source).map_err(|e| transfer_error(source, destination, e))
            }
        }
    }
}

fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

fn transfer_error(from: &Path, to: &Path, source: io::Error) -> OrganizeError {
    OrganizeError::Transfer {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}
