//! Checksum validation for migrations
//!
//! An applied migration whose embedded SQL later changes is refused rather
//! than silently skipped.

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string, hex encoded
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
