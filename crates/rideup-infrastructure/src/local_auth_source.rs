//! In-process auth session source.
//!
//! Stands in for a hosted auth provider: the host calls
//! [`LocalAuthSessionSource::sign_in`] / [`LocalAuthSessionSource::sign_out`]
//! and every subscribed listener observes the change in order.

use rideup_core::auth::{AuthSessionSource, Identity, IdentityListener, Subscription};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct SourceState {
    current: Option<Identity>,
    listeners: BTreeMap<u64, IdentityListener>,
}

/// Auth session source driven by explicit sign-in and sign-out calls.
///
/// Like hosted providers, a new subscriber is called once right away with the
/// current identity (or `None`) and then on every change. Deliveries are
/// serialized, so listeners must not sign in or out from inside the callback.
#[derive(Clone, Default)]
pub struct LocalAuthSessionSource {
    state: Arc<Mutex<SourceState>>,
    delivery: Arc<Mutex<()>>,
    next_id: Arc<AtomicU64>,
}

impl LocalAuthSessionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs `identity` in and notifies listeners.
    pub fn sign_in(&self, identity: impl Into<Identity>) {
        self.set_identity(Some(identity.into()));
    }

    /// Signs the current user out and notifies listeners.
    pub fn sign_out(&self) {
        self.set_identity(None);
    }

    /// Re-emits the current identity, as a token refresh does.
    pub fn refresh(&self) {
        let current = self.lock().current.clone();
        self.set_identity(current);
    }

    pub fn current(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn set_identity(&self, identity: Option<Identity>) {
        let _delivery = lock_ignoring_poison(&self.delivery);
        let listeners: Vec<IdentityListener> = {
            let mut state = self.lock();
            state.current = identity.clone();
            state.listeners.values().cloned().collect()
        };

        tracing::debug!(
            "[LocalAuth] Identity changed to {:?}, notifying {} listener(s)",
            identity.as_ref().map(Identity::as_str),
            listeners.len()
        );

        for listener in listeners {
            listener(identity.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, SourceState> {
        lock_ignoring_poison(&self.state)
    }
}

/// Listeners never run while `state` is held, so a poisoned guard still
/// protects consistent data.
fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AuthSessionSource for LocalAuthSessionSource {
    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let _delivery = lock_ignoring_poison(&self.delivery);
        let current = {
            let mut state = self.lock();
            state.listeners.insert(id, listener.clone());
            state.current.clone()
        };

        listener(current);

        let state = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                lock_ignoring_poison(&state).listeners.remove(&id);
            }
        })
    }
}
