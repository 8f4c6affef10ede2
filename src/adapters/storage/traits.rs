//! Storage abstraction trait
//!
//! This module defines the trait that storage backends must implement to
//! receive rendered order exports.

use async_trait::async_trait;

/// Storage sink for rendered export payloads
///
/// Writes are idempotent: putting the same content at the same path twice
/// leaves the backend in the same state. Ordinary write failures are reported
/// through the return value, never as an error.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Write `content` to `path`, replacing any existing file
    ///
    /// # Returns
    ///
    /// `true` if the content was written, `false` otherwise
    async fn put(&self, path: &str, content: &[u8]) -> bool;

    /// Short human-readable description of the backend for logs
    fn describe(&self) -> String;
}
