//! BLAKE3 content hasher.

use crate::core::hasher::traits::{stream_chunks, ContentFingerprint, ContentHasher, FingerprintAlgorithm};
use std::io::{self, Read};

/// Cryptographic fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Blake3Hasher {
    fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<(ContentFingerprint, u64)> {
        let mut hasher = ::blake3::Hasher::new();
        let read = stream_chunks(reader, |chunk| {
            hasher.update(chunk);
        })?;
        let hex = hasher.finalize().to_hex().to_string();
        Ok((ContentFingerprint::new(hex), read))
    }

    fn kind(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Blake3
    }
}
