//! In-memory DocumentStore implementation.

use async_trait::async_trait;
use rideup_core::error::Result;
use rideup_core::profile::{Document, DocumentPatch, DocumentStore, validate_segment};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::clock::server_timestamp;

/// Document store backed by a process-local map.
///
/// Counts reads and writes so hosts and tests can observe how much traffic a
/// flow generated.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<(String, String), Document>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a document wholesale, bypassing merge semantics and counters.
    pub async fn seed(&self, collection: &str, key: &str, document: Document) {
        self.documents
            .write()
            .await
            .insert((collection.to_string(), key.to_string()), document);
    }

    /// Returns a copy of a document without counting a read.
    pub async fn snapshot(&self, collection: &str, key: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of `get` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful `merge_patch` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        validate_segment(collection)?;
        validate_segment(key)?;

        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot(collection, key).await)
    }

    async fn merge_patch(&self, collection: &str, key: &str, patch: DocumentPatch) -> Result<()> {
        validate_segment(collection)?;
        validate_segment(key)?;

        let now = server_timestamp();
        let mut documents = self.documents.write().await;
        let document = documents
            .entry((collection.to_string(), key.to_string()))
            .or_default();
        patch.apply_to(document, &now);
        drop(documents);

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rideup_core::RideupError;
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.get("users", "nobody").await.unwrap().is_none());
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_merge_patch_preserves_other_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .seed(
                "users",
                "u1",
                doc(json!({ "displayName": "Ana", "stats": { "followers": 2 } })),
            )
            .await;

        let patch = DocumentPatch::new(doc(json!({ "stats": { "following": 0 } })))
            .with_server_timestamp("updatedAt");
        store.merge_patch("users", "u1", patch).await.unwrap();

        let stored = store.snapshot("users", "u1").await.unwrap();
        assert_eq!(stored["displayName"], json!("Ana"));
        assert_eq!(stored["stats"], json!({ "followers": 2, "following": 0 }));
        assert!(stored["updatedAt"].is_string());
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_merge_patch_creates_missing_document() {
        let store = InMemoryDocumentStore::new();
        let patch = DocumentPatch::new(doc(json!({ "upcomingEvents": [] })));

        store.merge_patch("users", "new", patch).await.unwrap();

        assert_eq!(
            store.snapshot("users", "new").await,
            Some(doc(json!({ "upcomingEvents": [] })))
        );
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected() {
        let store = InMemoryDocumentStore::new();
        let err = store.get("users", "../etc").await.unwrap_err();
        assert!(matches!(err, RideupError::InvalidKey(_)));
        assert_eq!(store.reads(), 0);
    }
}
