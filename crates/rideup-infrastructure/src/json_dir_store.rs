//! Directory-backed DocumentStore implementation.
//!
//! Directory structure:
//! ```text
//! root/
//! └── users/
//!     ├── uid-1.json
//!     └── uid-2.json
//! ```

use async_trait::async_trait;
use rideup_core::error::{RideupError, Result};
use rideup_core::profile::{Document, DocumentPatch, DocumentStore, validate_segment};
use std::path::{Path, PathBuf};

use crate::clock::server_timestamp;
use crate::paths::RideupPaths;
use crate::storage::AtomicJsonFile;

/// Stores each document as a pretty-printed JSON file.
///
/// Merge writes take an exclusive lock on the document, so concurrent
/// writers (including other processes) never lose each other's keys.
#[derive(Debug, Clone)]
pub struct JsonDirDocumentStore {
    root: PathBuf,
}

impl JsonDirDocumentStore {
    /// Creates a store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store at the platform data directory (`~/.local/share/rideup/store`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(RideupPaths::store_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `collection/key`.
    pub fn document_path(&self, collection: &str, key: &str) -> Result<PathBuf> {
        validate_segment(collection)?;
        validate_segment(key)?;
        Ok(self.root.join(collection).join(format!("{}.json", key)))
    }

    fn file(&self, collection: &str, key: &str) -> Result<AtomicJsonFile<Document>> {
        Ok(AtomicJsonFile::new(self.document_path(collection, key)?))
    }
}

/// Runs blocking file I/O off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RideupError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl DocumentStore for JsonDirDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let file = self.file(collection, key)?;
        run_blocking(move || file.load()).await
    }

    async fn merge_patch(&self, collection: &str, key: &str, patch: DocumentPatch) -> Result<()> {
        let file = self.file(collection, key)?;
        let path = file.path().to_path_buf();

        run_blocking(move || {
            file.update(|current| {
                let mut document = current.unwrap_or_default();
                patch.apply_to(&mut document, &server_timestamp());
                Ok(document)
            })
        })
        .await?;

        tracing::debug!("[JsonDirStore] Merged patch into {}", path.display());
        Ok(())
    }
}
