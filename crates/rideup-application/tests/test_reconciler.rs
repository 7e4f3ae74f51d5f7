use async_trait::async_trait;
use rideup_application::{ProfileReconciler, ReconcileError, ReconcileErrorCallback, ReconcileOutcome};
use rideup_core::RideupError;
use rideup_core::auth::Identity;
use rideup_core::config::ReconcilerSettings;
use rideup_core::error::Result;
use rideup_core::profile::{Document, DocumentPatch, DocumentStore, ProfileFields, compute_patch};
use rideup_infrastructure::{InMemoryDocumentStore, JsonDirDocumentStore, LocalAuthSessionSource};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

fn uid(raw: &str) -> Option<Identity> {
    Some(Identity::new(raw))
}

async fn seeded(key: &str, value: Value) -> Arc<InMemoryDocumentStore> {
    let store = Arc::new(InMemoryDocumentStore::new());
    store.seed("users", key, doc(value)).await;
    store
}

fn reconciler(store: Arc<dyn DocumentStore>) -> Arc<ProfileReconciler> {
    Arc::new(ProfileReconciler::new(store, ReconcilerSettings::default()))
}

/// Store double whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryDocumentStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RideupError::unavailable("read timed out"));
        }
        self.inner.get(collection, key).await
    }

    async fn merge_patch(&self, collection: &str, key: &str, patch: DocumentPatch) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RideupError::permission_denied("rules rejected write"));
        }
        self.inner.merge_patch(collection, key, patch).await
    }
}

/// Store whose reads take long enough to still be pending when the test acts.
#[derive(Default)]
struct SlowStore {
    inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.inner.get(collection, key).await
    }

    async fn merge_patch(&self, collection: &str, key: &str, patch: DocumentPatch) -> Result<()> {
        self.inner.merge_patch(collection, key, patch).await
    }
}

fn recording_callback() -> (ReconcileErrorCallback, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: ReconcileErrorCallback = Arc::new(move |err: &ReconcileError| {
        sink.lock().unwrap().push(err.identity().to_string());
    });
    (callback, seen)
}

#[tokio::test]
async fn test_legacy_favorites_migrate_with_stats_defaults() {
    let store = seeded(
        "u1",
        json!({ "stats": {}, "favoriteEvents": [{ "id": "e1" }] }),
    )
    .await;

    let outcome = reconciler(store.clone()).on_identity_change(uid("u1")).await;

    let ReconcileOutcome::Patched { patch, .. } = outcome else {
        panic!("expected a patch, got {:?}", outcome);
    };
    assert_eq!(
        Value::Object(patch.to_fields()),
        json!({
            "stats": { "followers": 0, "following": 0 },
            "upcomingEvents": [{ "id": "e1" }]
        })
    );

    let stored = store.snapshot("users", "u1").await.unwrap();
    assert_eq!(stored["favoriteEvents"], json!([{ "id": "e1" }]));
    assert_eq!(stored["upcomingEvents"], json!([{ "id": "e1" }]));
    assert!(stored["updatedAt"].is_string());
}

#[tokio::test]
async fn test_up_to_date_document_is_not_written() {
    let original = json!({
        "stats": { "followers": 3, "following": 5 },
        "upcomingEvents": [{ "id": "e9" }]
    });
    let store = seeded("u1", original.clone()).await;

    let outcome = reconciler(store.clone()).on_identity_change(uid("u1")).await;

    assert!(matches!(outcome, ReconcileOutcome::UpToDate { .. }));
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 0);
    assert_eq!(store.snapshot("users", "u1").await, Some(doc(original)));
}

#[tokio::test]
async fn test_missing_document_is_backfilled() {
    let store = Arc::new(InMemoryDocumentStore::new());

    let outcome = reconciler(store.clone()).on_identity_change(uid("u1")).await;

    assert!(outcome.is_patched());
    let mut stored = store.snapshot("users", "u1").await.unwrap();
    assert!(stored.remove("updatedAt").is_some());
    assert_eq!(
        Value::Object(stored),
        json!({ "stats": { "followers": 0, "following": 0 }, "upcomingEvents": [] })
    );
}

#[tokio::test]
async fn test_empty_document_gets_defaults_and_keeps_other_fields() {
    let store = seeded(
        "u1",
        json!({ "displayName": "Ana", "stats": { "attendedEventsCount": 4 } }),
    )
    .await;

    reconciler(store.clone()).on_identity_change(uid("u1")).await;

    let stored = store.snapshot("users", "u1").await.unwrap();
    assert_eq!(stored["displayName"], "Ana");
    assert_eq!(
        stored["stats"],
        json!({ "attendedEventsCount": 4, "followers": 0, "following": 0 })
    );
    assert_eq!(stored["upcomingEvents"], json!([]));
}

#[tokio::test]
async fn test_second_pass_is_a_no_op() {
    let documents = [
        json!({}),
        json!({ "favoriteEvents": ["a", "b", "c"] }),
        json!({ "favoriteEvents": "broken" }),
        json!({ "stats": { "followers": 9 } }),
        json!({ "stats": 7, "upcomingEvents": [] }),
    ];

    for (i, document) in documents.into_iter().enumerate() {
        let key = format!("u{}", i);
        let store = seeded(&key, document).await;
        let reconciler = reconciler(store.clone());

        let first = reconciler.on_identity_change(uid(&key)).await;
        let second = reconciler.on_identity_change(uid(&key)).await;

        assert!(first.is_patched(), "{}: {:?}", key, first);
        assert!(
            matches!(second, ReconcileOutcome::UpToDate { .. }),
            "{}: {:?}",
            key,
            second
        );
        assert_eq!(store.writes(), 1);

        let stored = store.snapshot("users", &key).await.unwrap();
        let fields = ProfileFields::from_document(&stored);
        assert!(fields.satisfies_schema());
        assert!(compute_patch(&fields).is_empty());
    }
}

#[tokio::test]
async fn test_signed_out_event_reads_nothing() {
    let store = Arc::new(InMemoryDocumentStore::new());

    let outcome = reconciler(store.clone()).on_identity_change(None).await;

    assert_eq!(outcome, ReconcileOutcome::SignedOut);
    assert_eq!(store.reads(), 0);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_read_failure_drops_event() {
    let store = Arc::new(FlakyStore::default());
    store.fail_reads.store(true, Ordering::SeqCst);
    let reconciler = reconciler(store.clone());
    let (callback, seen) = recording_callback();
    reconciler.set_error_callback(callback).await;

    let outcome = reconciler.on_identity_change(uid("u1")).await;

    assert!(matches!(outcome, ReconcileOutcome::ReadFailed { .. }));
    assert_eq!(store.inner.writes(), 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_write_failure_reaches_callback_and_later_events_proceed() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let reconciler = reconciler(store.clone());
    let (callback, seen) = recording_callback();
    reconciler.set_error_callback(callback).await;

    let failed = reconciler.on_identity_change(uid("u1")).await;
    assert!(matches!(failed, ReconcileOutcome::WriteFailed { .. }));
    assert_eq!(*seen.lock().unwrap(), vec!["u1".to_string()]);
    assert!(store.inner.snapshot("users", "u1").await.is_none());

    store.fail_writes.store(false, Ordering::SeqCst);
    let retried = reconciler.on_identity_change(uid("u1")).await;
    assert!(retried.is_patched());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_started_reconciler_follows_auth_source() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let source = LocalAuthSessionSource::new();
    source.sign_in("u1");

    let reconciler = reconciler(store.clone());
    reconciler.start(&source).unwrap();
    reconciler.drain().await;
    assert!(store.snapshot("users", "u1").await.is_some());

    source.sign_out();
    source.sign_in("u2");
    reconciler.drain().await;
    assert!(store.snapshot("users", "u2").await.is_some());
    assert_eq!(store.reads(), 2);

    assert!(reconciler.stop());
    source.sign_in("u3");
    reconciler.drain().await;
    assert!(store.snapshot("users", "u3").await.is_none());
    assert_eq!(store.reads(), 2);
}

#[tokio::test]
async fn test_stop_lets_in_flight_event_finish() {
    let store = Arc::new(SlowStore::default());
    let source = LocalAuthSessionSource::new();
    let reconciler = reconciler(store.clone());
    reconciler.start(&source).unwrap();

    source.sign_in("u1");
    assert!(reconciler.stop());
    assert!(!reconciler.is_running());
    assert_eq!(reconciler.in_flight(), 1);

    reconciler.drain().await;

    assert_eq!(reconciler.in_flight(), 0);
    assert_eq!(store.inner.writes(), 1);
    let stored = store.inner.snapshot("users", "u1").await.unwrap();
    assert_eq!(stored["stats"], json!({ "followers": 0, "following": 0 }));
    assert!(stored["updatedAt"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_events_converge() {
    let store = seeded("u1", json!({ "favoriteEvents": ["e1", "e2"] })).await;
    let source = LocalAuthSessionSource::new();
    let reconciler = reconciler(store.clone());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    reconciler.set_outcome_sender(tx).await;
    reconciler.start(&source).unwrap();

    for _ in 0..10 {
        source.sign_in("u1");
    }
    reconciler.drain().await;

    let mut outcomes = Vec::new();
    while let Ok(outcome) = rx.try_recv() {
        outcomes.push(outcome);
    }
    // Initial signed-out delivery plus ten sign-ins.
    assert_eq!(outcomes.len(), 11);
    assert!(outcomes.iter().all(|o| !o.is_failure()));
    assert!(store.writes() >= 1);

    let stored = store.snapshot("users", "u1").await.unwrap();
    assert_eq!(stored["upcomingEvents"], json!(["e1", "e2"]));
    assert_eq!(stored["favoriteEvents"], json!(["e1", "e2"]));
    assert!(ProfileFields::from_document(&stored).satisfies_schema());
}

#[tokio::test]
async fn test_reconciles_json_dir_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonDirDocumentStore::new(temp_dir.path()));
    store
        .merge_patch(
            "users",
            "u1",
            DocumentPatch::new(doc(json!({ "displayName": "Jo", "favoriteEvents": ["e4"] }))),
        )
        .await
        .unwrap();

    let reconciler = reconciler(store.clone());
    assert!(reconciler.on_identity_change(uid("u1")).await.is_patched());
    assert!(matches!(
        reconciler.on_identity_change(uid("u1")).await,
        ReconcileOutcome::UpToDate { .. }
    ));

    let stored = store.get("users", "u1").await.unwrap().unwrap();
    assert_eq!(stored["displayName"], "Jo");
    assert_eq!(stored["upcomingEvents"], json!(["e4"]));
    assert_eq!(stored["stats"], json!({ "followers": 0, "following": 0 }));
}
