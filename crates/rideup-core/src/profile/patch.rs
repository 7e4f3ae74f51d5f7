//! Schema backfill patch computation.
//!
//! [`compute_patch`] is the pure half of profile reconciliation: given what a
//! stored document currently holds, it returns the smallest merge that brings
//! the document up to the current schema. It never reads or writes anything.

use serde::Serialize;
use serde_json::Value;

use super::document::{Document, DocumentPatch};
use super::fields::{ProfileFields, field};

/// Default written for a missing follower or following counter.
const DEFAULT_COUNTER: u64 = 0;

/// Counter defaults to merge under `stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<u64>,
}

impl StatsPatch {
    pub fn is_empty(&self) -> bool {
        self.followers.is_none() && self.following.is_none()
    }
}

/// Field updates that bring a profile document up to the current schema.
///
/// An empty patch means the document already satisfies the schema and no
/// write should be issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_events: Option<Vec<Value>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.stats.is_none() && self.upcoming_events.is_none()
    }

    /// Renders the patch as document fields for a merge write.
    pub fn to_fields(&self) -> Document {
        let mut fields = Document::new();

        if let Some(stats) = &self.stats {
            let mut nested = Document::new();
            if let Some(followers) = stats.followers {
                nested.insert(field::stats::FOLLOWERS.to_string(), Value::from(followers));
            }
            if let Some(following) = stats.following {
                nested.insert(field::stats::FOLLOWING.to_string(), Value::from(following));
            }
            fields.insert(field::STATS.to_string(), Value::Object(nested));
        }

        if let Some(events) = &self.upcoming_events {
            fields.insert(
                field::UPCOMING_EVENTS.to_string(),
                Value::Array(events.clone()),
            );
        }

        fields
    }

    /// Builds the merge write, stamping `updatedAt` with the store's clock.
    pub fn to_write(&self) -> DocumentPatch {
        DocumentPatch::new(self.to_fields()).with_server_timestamp(field::UPDATED_AT)
    }
}

/// Computes the backfill patch for the given field set.
///
/// - Missing `stats.followers` / `stats.following` default to `0`.
/// - Missing `upcomingEvents` is copied from `favoriteEvents` when that legacy
///   field exists (an empty list if it is not an array), otherwise it starts
///   empty.
/// - A present `upcomingEvents` is never touched, and `favoriteEvents` is
///   never modified.
pub fn compute_patch(fields: &ProfileFields) -> ProfilePatch {
    let stats = StatsPatch {
        followers: fields.followers.is_none().then_some(DEFAULT_COUNTER),
        following: fields.following.is_none().then_some(DEFAULT_COUNTER),
    };

    let upcoming_events = match (&fields.upcoming_events, &fields.favorite_events) {
        (Some(_), _) => None,
        (None, Some(Value::Array(favorites))) => Some(favorites.clone()),
        (None, _) => Some(Vec::new()),
    };

    ProfilePatch {
        stats: (!stats.is_empty()).then_some(stats),
        upcoming_events,
    }
}
