//! Presence view over a stored user profile document.

use serde_json::Value;

use super::document::Document;

/// Top-level and nested field names of the `users` document schema.
pub mod field {
    pub const ID: &str = "id";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const EMAIL: &str = "email";
    pub const SCHOOL: &str = "school";
    pub const CITY: &str = "city";
    pub const HAS_CAR: &str = "hasCar";
    pub const PUBLIC_DESCRIPTION: &str = "publicDescription";
    pub const PHOTO_URL: &str = "photoURL";
    pub const PHOTO: &str = "photo";
    pub const STATS: &str = "stats";
    pub const UPCOMING_EVENTS: &str = "upcomingEvents";
    /// Legacy name of `upcomingEvents`, still present on old documents.
    pub const FAVORITE_EVENTS: &str = "favoriteEvents";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";

    /// Counters nested under `stats`.
    pub mod stats {
        pub const FOLLOWERS: &str = "followers";
        pub const FOLLOWING: &str = "following";
        pub const ATTENDED_EVENTS_COUNT: &str = "attendedEventsCount";
        pub const COMPLETED_RIDES_COUNT: &str = "completedRidesCount";
        pub const RELIABILITY_SCORE: &str = "reliabilityScore";
        pub const NO_SHOW_COUNT: &str = "noShowCount";
    }

    /// Avatar metadata nested under `photo`.
    pub mod photo {
        pub const STORAGE_PATH: &str = "storagePath";
        pub const CONTENT_TYPE: &str = "contentType";
        pub const UPDATED_AT: &str = "updatedAt";
    }
}

/// Name shown for profiles without a usable display name.
pub const DEFAULT_DISPLAY_NAME: &str = "New User";

/// The fields the reconciler inspects, each `None` only when truly absent.
///
/// A stored `0` or `null` is `Some`, so it is never re-defaulted. When
/// `stats` is missing or is not an object, both counters read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub followers: Option<Value>,
    pub following: Option<Value>,
    pub upcoming_events: Option<Value>,
    pub favorite_events: Option<Value>,
}

impl ProfileFields {
    /// Field set of a document that does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_document(doc: &Document) -> Self {
        let stats = doc.get(field::STATS).and_then(Value::as_object);

        Self {
            followers: stats.and_then(|s| s.get(field::stats::FOLLOWERS)).cloned(),
            following: stats.and_then(|s| s.get(field::stats::FOLLOWING)).cloned(),
            upcoming_events: doc.get(field::UPCOMING_EVENTS).cloned(),
            favorite_events: doc.get(field::FAVORITE_EVENTS).cloned(),
        }
    }

    /// True when followers, following and upcoming events are all present.
    pub fn satisfies_schema(&self) -> bool {
        self.followers.is_some() && self.following.is_some() && self.upcoming_events.is_some()
    }

    /// True when the legacy list exists but is not an array.
    pub fn has_malformed_favorites(&self) -> bool {
        self.favorite_events
            .as_ref()
            .is_some_and(|value| !value.is_array())
    }
}

impl From<&Document> for ProfileFields {
    fn from(doc: &Document) -> Self {
        Self::from_document(doc)
    }
}
