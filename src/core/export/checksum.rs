//! Payload checksums
//!
//! Every written export payload is fingerprinted so runs can be compared and
//! downstream consumers can verify what they received.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of a rendered payload
///
/// # Returns
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use order_export::core::export::checksum::payload_checksum;
///
/// let checksum = payload_checksum(b"<order/>");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn payload_checksum(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let result = hasher.finalize();
    format!("{result:x}")
}
