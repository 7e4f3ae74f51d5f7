//! Read model for the profile card.

use serde::Serialize;
use serde_json::Value;

use super::document::Document;
use super::fields::{DEFAULT_DISPLAY_NAME, field};

/// What the profile screen shows for a user.
///
/// Counters default to zero when missing or not numeric, so the summary can
/// be built from documents of any schema version.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Trimmed display name, or the default name when blank.
    pub display_name: String,
    /// Lowercased display name without whitespace, shown as `@handle`.
    pub handle: String,
    pub school: Option<String>,
    pub photo_url: Option<String>,
    pub events: u64,
    pub rides: u64,
    pub followers: u64,
    pub following: u64,
    pub reliability: f64,
    pub no_shows: u64,
    pub upcoming_events: Vec<Value>,
}

impl ProfileSummary {
    pub fn from_document(doc: &Document) -> Self {
        let stats = doc.get(field::STATS).and_then(Value::as_object);
        let counter = |name: &str| {
            stats
                .and_then(|s| s.get(name))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        let text = |name: &str| {
            doc.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let display_name =
            text(field::DISPLAY_NAME).unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        Self {
            handle: handle_for(&display_name),
            display_name,
            school: text(field::SCHOOL),
            photo_url: text(field::PHOTO_URL),
            events: counter(field::stats::ATTENDED_EVENTS_COUNT),
            rides: counter(field::stats::COMPLETED_RIDES_COUNT),
            followers: counter(field::stats::FOLLOWERS),
            following: counter(field::stats::FOLLOWING),
            reliability: stats
                .and_then(|s| s.get(field::stats::RELIABILITY_SCORE))
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            no_shows: counter(field::stats::NO_SHOW_COUNT),
            upcoming_events: doc
                .get(field::UPCOMING_EVENTS)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

fn handle_for(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
