//! Auth session source contract.

use std::fmt;
use std::sync::Arc;

use super::identity::Identity;

/// Callback invoked with the current identity, or `None` after sign-out.
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Emits the signed-in identity whenever it changes.
///
/// Implementations deliver events for one source in a single ordered stream.
/// Listeners must return quickly; long-running work belongs on a spawned task.
pub trait AuthSessionSource: Send + Sync {
    /// Registers `listener` and returns the handle that removes it.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}

/// Handle returned by [`AuthSessionSource::subscribe`].
///
/// Calling [`Subscription::unsubscribe`] or dropping the handle stops future
/// deliveries. Work the listener already started is not affected.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Creates a handle that runs `cancel` exactly once on unsubscribe or drop.
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Stops future deliveries to the listener.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
