//! XXH3-128 content hasher.

use crate::core::hasher::traits::{stream_chunks, ContentFingerprint, ContentHasher, FingerprintAlgorithm};
use std::io::{self, Read};
use xxhash_rust::xxh3::Xxh3;

/// Fast, non-cryptographic fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Hasher;

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Xxh3Hasher {
    fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<(ContentFingerprint, u64)> {
        let mut hasher = Xxh3::new();
        let read = stream_chunks(reader, |chunk| hasher.update(chunk))?;
        let hex = format!("{:032x}", hasher.digest128());
        Ok((ContentFingerprint::new(hex), read))
    }

    fn kind(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Xxh3
    }
}
