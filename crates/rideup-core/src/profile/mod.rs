//! User profile domain module.
//!
//! Profile documents live in the `users` collection of a schemaless document
//! store and may have been written by any past version of the app. This
//! module owns the document model, the backfill patch that upgrades old
//! documents, and the store contract the reconciler writes through.
//!
//! # Module Structure
//!
//! - `document`: document values and merge-patch semantics
//! - `fields`: schema field names and the presence view used for backfill
//! - `patch`: pure backfill patch computation
//! - `store`: the document store trait
//! - `signup`: the initial document written at account creation
//! - `edit`: edits and avatar updates from the profile edit screen
//! - `summary`: the read model shown on the profile card

mod document;
mod edit;
mod fields;
mod patch;
mod signup;
mod store;
mod summary;

pub use document::{Document, DocumentPatch, merge_fields};
pub use edit::{
    AVATAR_CONTENT_TYPE, DEFAULT_CITY, PUBLIC_DESCRIPTION_MAX_CHARS, ProfileEdit,
    avatar_storage_path, clamp_description, photo_update_patch,
};
pub use fields::{DEFAULT_DISPLAY_NAME, ProfileFields, field};
pub use patch::{ProfilePatch, StatsPatch, compute_patch};
pub use signup::{SchoolChoice, SignupForm, initial_profile_document};
pub use store::{DocumentStore, USERS_COLLECTION, validate_segment};
pub use summary::ProfileSummary;
