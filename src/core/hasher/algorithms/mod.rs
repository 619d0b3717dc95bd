//! Fingerprint algorithm implementations.

mod blake3;
mod xxh3;

pub use self::blake3::Blake3Hasher;
pub use self::xxh3::Xxh3Hasher;
