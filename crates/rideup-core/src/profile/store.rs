//! Document store trait.

use async_trait::async_trait;

use super::document::{Document, DocumentPatch};
use crate::error::{RideupError, Result};

/// Collection holding one profile document per identity.
pub const USERS_COLLECTION: &str = "users";

/// Repository for schemaless documents addressed by collection and key.
///
/// The store is shared with every other profile-writing flow, so writers go
/// through [`DocumentStore::merge_patch`] and only touch the keys they name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document. Returns `Ok(None)` when it does not exist.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Merges `patch` into the document, creating it when absent.
    ///
    /// The write is all-or-nothing: on error the stored document is unchanged.
    async fn merge_patch(&self, collection: &str, key: &str, patch: DocumentPatch) -> Result<()>;
}

/// Rejects collection names and keys that cannot be used as a single path
/// segment.
pub fn validate_segment(segment: &str) -> Result<()> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']);

    if invalid {
        return Err(RideupError::invalid_key(segment));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment() {
        assert!(validate_segment("users").is_ok());
        assert!(validate_segment("uid-123_abc").is_ok());

        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_segment(bad), Err(RideupError::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
