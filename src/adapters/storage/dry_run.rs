//! Dry-run storage that never writes

use super::traits::StorageSink;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Storage that logs the write it would have performed and reports success
#[derive(Debug, Default)]
pub struct DryRunStorage {
    writes: AtomicUsize,
}

impl DryRunStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes that were skipped
    pub fn skipped_writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StorageSink for DryRunStorage {
    async fn put(&self, path: &str, content: &[u8]) -> bool {
        self.writes.fetch_add(1, Ordering::Relaxed);
        tracing::info!(path = %path, bytes = content.len(), "Dry run - skipping write");
        true
    }

    fn describe(&self) -> String {
        "dry-run".to_string()
    }
}
