//! Profile reconciliation service.
//!
//! Keeps every signed-in user's profile document on the current schema. On
//! each identity change the reconciler reads `users/<id>`, computes the
//! backfill patch, and merge-writes it only when it is non-empty.

use crate::outcome::{ReconcileError, ReconcileOutcome};
use rideup_core::auth::{AuthSessionSource, Identity, IdentityListener, Subscription};
use rideup_core::config::{MissingDocumentPolicy, ReconcilerSettings};
use rideup_core::error::{RideupError, Result};
use rideup_core::profile::{DocumentStore, ProfileFields, compute_patch};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;
use tokio::sync::{RwLock, mpsc};
use tokio_util::task::TaskTracker;

/// Callback type for reconciliation failures the host should hear about.
pub type ReconcileErrorCallback = Arc<dyn Fn(&ReconcileError) + Send + Sync>;

/// Reconciles profile documents as users sign in.
///
/// # Lifecycle
///
/// The host constructs the reconciler, calls [`ProfileReconciler::start`]
/// with its auth source, and later [`ProfileReconciler::stop`]. Each event is
/// handled on its own task; [`ProfileReconciler::drain`] waits for the ones
/// still running.
pub struct ProfileReconciler {
    /// Store holding profile documents
    store: Arc<dyn DocumentStore>,
    settings: ReconcilerSettings,
    /// Optional callback for write failures (for host error reporting)
    error_callback: RwLock<Option<ReconcileErrorCallback>>,
    /// Optional channel receiving every outcome
    outcome_sender: RwLock<Option<mpsc::UnboundedSender<ReconcileOutcome>>>,
    subscription: Mutex<Option<Subscription>>,
    tasks: TaskTracker,
}

impl ProfileReconciler {
    pub fn new(store: Arc<dyn DocumentStore>, settings: ReconcilerSettings) -> Self {
        Self {
            store,
            settings,
            error_callback: RwLock::new(None),
            outcome_sender: RwLock::new(None),
            subscription: Mutex::new(None),
            tasks: TaskTracker::new(),
        }
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Sets a callback to be invoked when a patch write fails.
    pub async fn set_error_callback(&self, callback: ReconcileErrorCallback) {
        *self.error_callback.write().await = Some(callback);
    }

    /// Sends every subsequent outcome to `sender`.
    ///
    /// A closed receiver is ignored.
    pub async fn set_outcome_sender(&self, sender: mpsc::UnboundedSender<ReconcileOutcome>) {
        *self.outcome_sender.write().await = Some(sender);
    }

    /// Subscribes to `source` and reconciles on every identity it emits.
    ///
    /// Must be called from within a Tokio runtime; events are handled on that
    /// runtime even when the source emits from another thread. Calling
    /// `start` while already running does nothing.
    pub fn start(self: &Arc<Self>, source: &dyn AuthSessionSource) -> Result<()> {
        let handle = Handle::try_current().map_err(|e| {
            RideupError::unavailable(format!("Reconciler requires a Tokio runtime: {}", e))
        })?;

        let mut subscription = self.lock_subscription();
        if subscription.is_some() {
            tracing::warn!("[Reconciler] Already started, skipping");
            return Ok(());
        }

        let reconciler = Arc::downgrade(self);
        let listener: IdentityListener = Arc::new(move |identity: Option<Identity>| {
            Self::dispatch(&reconciler, &handle, identity);
        });

        *subscription = Some(source.subscribe(listener));
        tracing::info!(
            collection = %self.settings.collection,
            "[Reconciler] Started"
        );
        Ok(())
    }

    /// Unsubscribes from the auth source.
    ///
    /// Events already being handled run to completion. Returns false when the
    /// reconciler was not running.
    pub fn stop(&self) -> bool {
        let subscription = self.lock_subscription().take();
        match subscription {
            Some(subscription) => {
                subscription.unsubscribe();
                tracing::info!("[Reconciler] Stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_subscription().is_some()
    }

    /// Number of events currently being handled.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits until every event handled so far has finished.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Handles one identity change and reports the outcome.
    ///
    /// Never fails: store errors become [`ReconcileOutcome::ReadFailed`] or
    /// [`ReconcileOutcome::WriteFailed`], and write failures are also passed
    /// to the error callback.
    pub async fn on_identity_change(&self, identity: Option<Identity>) -> ReconcileOutcome {
        let outcome = match identity {
            None => {
                tracing::debug!("[Reconciler] No signed-in user, nothing to reconcile");
                ReconcileOutcome::SignedOut
            }
            Some(identity) => match self.reconcile(&identity).await {
                Ok(outcome) => outcome,
                Err(err) => self.handle_failure(err).await,
            },
        };

        if let Some(sender) = self.outcome_sender.read().await.as_ref() {
            let _ = sender.send(outcome.clone());
        }
        outcome
    }

    fn dispatch(reconciler: &Weak<Self>, handle: &Handle, identity: Option<Identity>) {
        let Some(reconciler) = reconciler.upgrade() else {
            return;
        };

        let tasks = reconciler.tasks.clone();
        tasks.spawn_on(
            async move {
                reconciler.on_identity_change(identity).await;
            },
            handle,
        );
    }

    async fn reconcile(
        &self,
        identity: &Identity,
    ) -> std::result::Result<ReconcileOutcome, ReconcileError> {
        let collection = self.settings.collection.as_str();

        let document = self
            .store
            .get(collection, identity.as_str())
            .await
            .map_err(|source| ReconcileError::StoreRead {
                identity: identity.clone(),
                source,
            })?;

        let fields = match &document {
            Some(doc) => ProfileFields::from_document(doc),
            None if self.settings.missing_document_policy == MissingDocumentPolicy::Skip => {
                tracing::debug!(
                    identity = %identity,
                    "[Reconciler] Profile document missing, leaving creation to signup"
                );
                return Ok(ReconcileOutcome::SkippedMissing {
                    identity: identity.clone(),
                });
            }
            None => ProfileFields::empty(),
        };

        if fields.has_malformed_favorites() {
            tracing::warn!(
                identity = %identity,
                "[Reconciler] favoriteEvents is not a list, migrating as empty"
            );
        }

        let patch = compute_patch(&fields);
        if patch.is_empty() {
            tracing::debug!(identity = %identity, "[Reconciler] Profile up to date, skipping write");
            return Ok(ReconcileOutcome::UpToDate {
                identity: identity.clone(),
            });
        }

        self.store
            .merge_patch(collection, identity.as_str(), patch.to_write())
            .await
            .map_err(|source| ReconcileError::StoreWrite {
                identity: identity.clone(),
                source,
            })?;

        tracing::info!(
            identity = %identity,
            created = document.is_none(),
            "[Reconciler] Backfilled profile fields"
        );
        Ok(ReconcileOutcome::Patched {
            identity: identity.clone(),
            patch,
        })
    }

    async fn handle_failure(&self, err: ReconcileError) -> ReconcileOutcome {
        match &err {
            ReconcileError::StoreRead { .. } => {
                tracing::warn!("[Reconciler] {}; event dropped", err);
            }
            ReconcileError::StoreWrite { .. } => {
                tracing::error!("[Reconciler] {}", err);
                if let Some(callback) = self.error_callback.read().await.as_ref() {
                    callback(&err);
                }
            }
        }
        ReconcileOutcome::from(&err)
    }

    fn lock_subscription(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
