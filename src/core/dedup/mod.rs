//! # Dedup Module
//!
//! Decides, per fingerprint, which file is the original.
//!
//! The first caller to present a fingerprint wins and its destination
//! becomes the canonical path. Everyone after it is told `Duplicate`.
//! The check and the insert happen under one shard lock, so two workers
//! hashing identical content at the same moment can never both win.

use crate::core::hasher::ContentFingerprint;
use crate::core::organize::Placement;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};

/// Fingerprint to canonical destination, for one run
#[derive(Debug, Default)]
pub struct DedupIndex {
    entries: DashMap<ContentFingerprint, PathBuf>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic check-and-insert.
    ///
    /// Inserts `candidate` and returns `Original` if the fingerprint is
    /// unseen; otherwise returns `Duplicate` and leaves the index alone.
    pub fn resolve(&self, fingerprint: &ContentFingerprint, candidate: &Path) -> Placement {
        match self.entries.entry(fingerprint.clone()) {
            Entry::Occupied(_) => Placement::Duplicate,
            Entry::Vacant(vacant) => {
                vacant.insert(candidate.to_path_buf());
                Placement::Original
            }
        }
    }

    /// Undo a winning `resolve` whose placement failed.
    ///
    /// Only removes the entry if it still points at `destination`.
    pub fn release(&self, fingerprint: &ContentFingerprint, destination: &Path) -> bool {
        self.entries
            .remove_if(fingerprint, |_, canonical| canonical == destination)
            .is_some()
    }

    /// Canonical destination recorded for a fingerprint
    pub fn canonical(&self, fingerprint: &ContentFingerprint) -> Option<PathBuf> {
        self.entries.get(fingerprint).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
