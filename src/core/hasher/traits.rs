//! Trait definitions for content fingerprinting.

use crate::core::scanner::FileEntry;
use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};

/// Files are streamed through the hasher in chunks of this size
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Hex fingerprint of a file's full content.
///
/// Equal fingerprints mean equal content under the algorithm that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Available fingerprint functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// BLAKE3, 256-bit cryptographic hash
    #[default]
    Blake3,
    /// XXH3, 128-bit non-cryptographic checksum
    Xxh3,
}

impl FingerprintAlgorithm {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            FingerprintAlgorithm::Blake3 => {
                "BLAKE3 - cryptographic, distinct content will not be merged"
            }
            FingerprintAlgorithm::Xxh3 => {
                "XXH3-128 - faster checksum, crafted collisions could merge distinct files"
            }
        }
    }
}

impl std::fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintAlgorithm::Blake3 => write!(f, "blake3"),
            FingerprintAlgorithm::Xxh3 => write!(f, "xxh3"),
        }
    }
}

/// Trait for fingerprint implementations
pub trait ContentHasher: Send + Sync {
    /// Stream `reader` to the end.
    ///
    /// Returns the fingerprint and the number of bytes consumed.
    fn hash_reader(&self, reader: &mut dyn Read) -> io::Result<(ContentFingerprint, u64)>;

    /// Fingerprint a walked file.
    ///
    /// The byte count must match the size seen during the walk; a file
    /// that grew or shrank underneath us is reported, not hashed.
    fn hash_file(&self, entry: &FileEntry) -> Result<ContentFingerprint, HashError> {
        let io_error = |source| HashError::Io {
            path: entry.path.clone(),
            source,
        };

        let mut file = File::open(&entry.path).map_err(io_error)?;
        let (fingerprint, read) = self.hash_reader(&mut file).map_err(io_error)?;

        if read != entry.size {
            return Err(HashError::Truncated {
                path: entry.path.clone(),
                expected: entry.size,
                actual: read,
            });
        }

        Ok(fingerprint)
    }

    /// Get the algorithm kind
    fn kind(&self) -> FingerprintAlgorithm;
}

/// Feed `reader` to `update` in [`CHUNK_SIZE`] pieces until EOF.
pub(crate) fn stream_chunks(
    reader: &mut dyn Read,
    mut update: impl FnMut(&[u8]),
) -> io::Result<u64> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                update(&buffer[..n]);
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
