//! Signed-in identity value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a signed-in user for the lifetime of a session.
///
/// The same value keys the user's profile document in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps a raw identifier issued by the auth provider.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Returns the identifier as a document key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

impl From<String> for Identity {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
