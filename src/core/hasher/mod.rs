//! # Hasher Module
//!
//! Computes content fingerprints for files.
//!
//! ## Supported Algorithms
//! - **BLAKE3** - Cryptographic, the default. Two files share a
//!   fingerprint only if their bytes are identical.
//! - **XXH3-128** - Several times faster on fast disks, but a checksum:
//!   deliberately crafted files can collide, and a collision files
//!   distinct content as a duplicate.
//!
//! ## How It Works
//! 1. Open the file
//! 2. Stream it through the hash in 256 KB chunks
//! 3. Finalize to a lowercase hex string
//! 4. Check the byte count against the size seen during the walk
//!
//! No shared state is touched while hashing.
//!
//! ## Example
//! ```rust,ignore
//! use media_organizer::core::hasher::{HasherConfig, FingerprintAlgorithm};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(FingerprintAlgorithm::Xxh3)
//!     .build();
//!
//! let fingerprint = hasher.hash_file(&entry)?;
//! ```

mod algorithms;
mod traits;

pub use algorithms::{Blake3Hasher, Xxh3Hasher};
pub use traits::{ContentFingerprint, ContentHasher, FingerprintAlgorithm, CHUNK_SIZE};

/// Configuration builder for hashers
#[derive(Debug, Clone, Default)]
pub struct HasherConfig {
    algorithm: FingerprintAlgorithm,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fingerprint algorithm
    pub fn algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn ContentHasher> {
        match self.algorithm {
            FingerprintAlgorithm::Blake3 => Box::new(Blake3Hasher::new()),
            FingerprintAlgorithm::Xxh3 => Box::new(Xxh3Hasher::new()),
        }
    }
}
