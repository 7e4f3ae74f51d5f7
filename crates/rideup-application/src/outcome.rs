//! Results and failures of a single reconciliation attempt.

use rideup_core::RideupError;
use rideup_core::auth::Identity;
use rideup_core::profile::ProfilePatch;
use serde::Serialize;
use thiserror::Error;

/// What one identity-change event led to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// No one is signed in; nothing was read or written.
    SignedOut,
    /// The document already had every field; no write was issued.
    UpToDate { identity: Identity },
    /// The backfill patch was merged into the document.
    Patched {
        identity: Identity,
        patch: ProfilePatch,
    },
    /// The document does not exist and the policy leaves creation to signup.
    SkippedMissing { identity: Identity },
    /// The read failed; the event was dropped.
    ReadFailed { identity: Identity, message: String },
    /// The merge write failed and was reported to the error callback.
    WriteFailed { identity: Identity, message: String },
}

impl ReconcileOutcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            ReconcileOutcome::SignedOut => None,
            ReconcileOutcome::UpToDate { identity }
            | ReconcileOutcome::Patched { identity, .. }
            | ReconcileOutcome::SkippedMissing { identity }
            | ReconcileOutcome::ReadFailed { identity, .. }
            | ReconcileOutcome::WriteFailed { identity, .. } => Some(identity),
        }
    }

    /// True when a write reached the store.
    pub fn is_patched(&self) -> bool {
        matches!(self, ReconcileOutcome::Patched { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::ReadFailed { .. } | ReconcileOutcome::WriteFailed { .. }
        )
    }
}

impl From<&ReconcileError> for ReconcileOutcome {
    fn from(err: &ReconcileError) -> Self {
        match err {
            ReconcileError::StoreRead { identity, source } => ReconcileOutcome::ReadFailed {
                identity: identity.clone(),
                message: source.to_string(),
            },
            ReconcileError::StoreWrite { identity, source } => ReconcileOutcome::WriteFailed {
                identity: identity.clone(),
                message: source.to_string(),
            },
        }
    }
}

/// Store failure during reconciliation.
#[derive(Error, Debug, Clone)]
pub enum ReconcileError {
    #[error("Failed to read profile of {identity}: {source}")]
    StoreRead {
        identity: Identity,
        source: RideupError,
    },

    #[error("Failed to write profile patch for {identity}: {source}")]
    StoreWrite {
        identity: Identity,
        source: RideupError,
    },
}

impl ReconcileError {
    pub fn identity(&self) -> &Identity {
        match self {
            ReconcileError::StoreRead { identity, .. } | ReconcileError::StoreWrite { identity, .. } => {
                identity
            }
        }
    }

    /// True when the underlying store error may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ReconcileError::StoreRead { source, .. } | ReconcileError::StoreWrite { source, .. } => {
                source.is_transient()
            }
        }
    }
}
