//! Initial profile document written at account creation.

use serde_json::{Value, json};

use super::document::{Document, DocumentPatch};
use super::fields::{DEFAULT_DISPLAY_NAME, field};
use crate::auth::Identity;

const NO_SCHOOL: &str = "N/A";

/// School picked on the signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolChoice {
    /// "Not a student".
    None,
    /// Free-text entry for a school missing from the list.
    Other(String),
    /// A school picked from the list.
    Named(String),
}

impl SchoolChoice {
    fn resolve(&self) -> String {
        match self {
            Self::None => NO_SCHOOL.to_string(),
            Self::Other(custom) => custom.trim().to_string(),
            Self::Named(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    pub display_name: String,
    pub email: String,
    pub school: SchoolChoice,
}

/// Builds the merge write that creates a new user's profile.
///
/// The document is written in the current schema, so the reconciler finds
/// nothing to backfill on the following sign-in.
pub fn initial_profile_document(identity: &Identity, form: &SignupForm) -> DocumentPatch {
    let display_name = match form.display_name.trim() {
        "" => DEFAULT_DISPLAY_NAME.to_string(),
        name => name.to_string(),
    };

    let stats: Document = [
        field::stats::ATTENDED_EVENTS_COUNT,
        field::stats::COMPLETED_RIDES_COUNT,
        field::stats::RELIABILITY_SCORE,
        field::stats::NO_SHOW_COUNT,
        field::stats::FOLLOWERS,
        field::stats::FOLLOWING,
    ]
    .into_iter()
    .map(|counter| (counter.to_string(), json!(0)))
    .collect();

    let mut fields = Document::new();
    fields.insert(field::ID.to_string(), json!(identity.as_str()));
    fields.insert(field::DISPLAY_NAME.to_string(), json!(display_name));
    fields.insert(
        field::EMAIL.to_string(),
        json!(form.email.trim().to_lowercase()),
    );
    fields.insert(field::SCHOOL.to_string(), json!(form.school.resolve()));
    fields.insert(field::HAS_CAR.to_string(), json!(false));
    fields.insert(field::PHOTO_URL.to_string(), json!(""));
    fields.insert(field::UPCOMING_EVENTS.to_string(), json!([]));
    fields.insert(field::STATS.to_string(), Value::Object(stats));

    DocumentPatch::new(fields)
        .with_server_timestamp(field::CREATED_AT)
        .with_server_timestamp(field::UPDATED_AT)
}
