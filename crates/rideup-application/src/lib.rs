//! Application layer for RideUp.
//!
//! This crate provides use case implementations that coordinate the domain
//! model with a document store: profile reconciliation on sign-in, plus
//! profile creation and reads.

pub mod outcome;
pub mod profile_service;
pub mod reconciler;

pub use outcome::{ReconcileError, ReconcileOutcome};
pub use profile_service::ProfileService;
pub use reconciler::{ProfileReconciler, ReconcileErrorCallback};
