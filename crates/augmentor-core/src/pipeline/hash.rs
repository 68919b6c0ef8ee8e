//! Content hashing for run reports.

use blake3::Hasher as Blake3Hasher;

/// BLAKE3 content hashing over in-memory buffers.
pub struct Hasher;

impl Hasher {
    /// Hex-encoded BLAKE3 hash of `data`.
    ///
    /// Used for both the source bytes and the finished archive so callers can
    /// verify that a seeded run reproduced the same output.
    pub fn content_hash(data: &[u8]) -> String {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        hasher.finalize().to_hex().to_string()
    }
}
