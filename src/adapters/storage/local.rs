//! Local filesystem storage

use super::traits::StorageSink;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Stores export files below a root directory on the local filesystem
///
/// Payloads are written to a hidden temporary sibling and renamed into place,
/// so a destination file only ever appears complete.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage rooted at `root`
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path below the root
    ///
    /// Returns `None` for absolute paths or paths that climb out of the root.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Whether a file already exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }
}

#[async_trait]
impl StorageSink for LocalStorage {
    async fn put(&self, path: &str, content: &[u8]) -> bool {
        let Some(target) = self.resolve(path) else {
            tracing::warn!(path = %path, "Refusing to write outside of the storage root");
            return false;
        };

        if let Some(parent) = target.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(
                    path = %target.display(),
                    error = %e,
                    "Failed to create export directory"
                );
                return false;
            }
        }

        let mut staged = StagedFile::new(&target);
        if let Err(e) = tokio::fs::write(&staged.path, content).await {
            tracing::warn!(path = %target.display(), error = %e, "Failed to write file");
            return false;
        }

        match tokio::fs::rename(&staged.path, &target).await {
            Ok(()) => {
                staged.committed = true;
                tracing::trace!(path = %target.display(), bytes = content.len(), "File written");
                true
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "Failed to move file into place");
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("local:{}", self.root.display())
    }
}

/// Temporary file next to a destination, removed on drop unless committed
struct StagedFile {
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(target: &Path) -> Self {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: target.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple())),
            committed: false,
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            // Missing when the write never started
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
