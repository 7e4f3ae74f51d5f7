//! Profile creation, edit and read use cases.

use rideup_core::RideupError;
use rideup_core::auth::Identity;
use rideup_core::error::Result;
use rideup_core::profile::{
    Document, DocumentPatch, DocumentStore, ProfileEdit, ProfileSummary, SignupForm,
    USERS_COLLECTION, initial_profile_document, photo_update_patch,
};
use std::sync::Arc;

/// Creates, edits and reads profile documents outside of reconciliation.
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, USERS_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Writes the initial profile for a freshly signed-up user.
    ///
    /// Merges into any document the reconciler may already have backfilled.
    pub async fn sign_up(&self, identity: &Identity, form: &SignupForm) -> Result<()> {
        let patch = initial_profile_document(identity, form);
        self.store
            .merge_patch(&self.collection, identity.as_str(), patch)
            .await?;

        tracing::info!(identity = %identity, "[ProfileService] Created profile");
        Ok(())
    }

    /// Saves the edit form over an existing profile.
    ///
    /// Fails with `NotFound` when the user has no profile yet.
    pub async fn update_profile(&self, identity: &Identity, edit: &ProfileEdit) -> Result<()> {
        self.update_existing(identity, edit.to_patch()).await?;
        tracing::info!(identity = %identity, "[ProfileService] Updated profile");
        Ok(())
    }

    /// Records an uploaded avatar on an existing profile.
    pub async fn update_photo(&self, identity: &Identity, download_url: &str) -> Result<()> {
        self.update_existing(identity, photo_update_patch(identity, download_url))
            .await?;
        tracing::info!(identity = %identity, "[ProfileService] Updated profile photo");
        Ok(())
    }

    /// Loads the raw profile document.
    pub async fn load(&self, identity: &Identity) -> Result<Option<Document>> {
        self.store.get(&self.collection, identity.as_str()).await
    }

    /// Loads the profile as shown on the profile screen.
    pub async fn summary(&self, identity: &Identity) -> Result<Option<ProfileSummary>> {
        Ok(self
            .load(identity)
            .await?
            .map(|doc| ProfileSummary::from_document(&doc)))
    }

    async fn update_existing(&self, identity: &Identity, patch: DocumentPatch) -> Result<()> {
        if self.load(identity).await?.is_none() {
            return Err(RideupError::not_found("profile", identity.as_str()));
        }
        self.store
            .merge_patch(&self.collection, identity.as_str(), patch)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rideup_core::profile::SchoolChoice;
    use rideup_infrastructure::InMemoryDocumentStore;

    #[tokio::test]
    async fn test_sign_up_then_summary() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = ProfileService::new(store.clone());
        let identity = Identity::new("u1");
        let form = SignupForm {
            display_name: "Ana".to_string(),
            email: " Ana@Example.com ".to_string(),
            school: SchoolChoice::None,
        };

        service.sign_up(&identity, &form).await.unwrap();

        let doc = service.load(&identity).await.unwrap().unwrap();
        assert_eq!(doc["email"], "ana@example.com");
        assert!(doc["createdAt"].is_string());

        let summary = service.summary(&identity).await.unwrap().unwrap();
        assert_eq!(summary.display_name, "Ana");
        assert_eq!(summary.school.as_deref(), Some("N/A"));
        assert_eq!(summary.followers, 0);
        assert!(summary.upcoming_events.is_empty());
    }

    #[tokio::test]
    async fn test_summary_of_missing_profile() {
        let service = ProfileService::new(Arc::new(InMemoryDocumentStore::new()));
        assert!(service.summary(&Identity::new("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_other_fields() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = ProfileService::new(store.clone());
        let identity = Identity::new("u1");
        let form = SignupForm {
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            school: SchoolChoice::None,
        };
        service.sign_up(&identity, &form).await.unwrap();

        let mut edit = ProfileEdit::from_document(&service.load(&identity).await.unwrap().unwrap());
        edit.city = "  ".to_string();
        edit.has_car = true;
        edit.public_description = "x".repeat(50);
        service.update_profile(&identity, &edit).await.unwrap();

        let doc = service.load(&identity).await.unwrap().unwrap();
        assert_eq!(doc["city"], "Atlanta");
        assert_eq!(doc["hasCar"], true);
        assert_eq!(doc["publicDescription"].as_str().unwrap().len(), 40);
        assert_eq!(doc["email"], "ana@example.com");
        assert_eq!(doc["stats"]["followers"], 0);
    }

    #[tokio::test]
    async fn test_update_photo_records_avatar() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = ProfileService::new(store.clone());
        let identity = Identity::new("u1");
        store
            .seed("users", "u1", Document::new())
            .await;

        service
            .update_photo(&identity, "https://cdn.example/u1.jpg")
            .await
            .unwrap();

        let summary = service.summary(&identity).await.unwrap().unwrap();
        assert_eq!(summary.photo_url.as_deref(), Some("https://cdn.example/u1.jpg"));
        let doc = service.load(&identity).await.unwrap().unwrap();
        assert_eq!(doc["photo"]["storagePath"], "user_avatars/u1/avatar.jpg");
        assert!(doc["photo"]["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_edits_require_existing_profile() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = ProfileService::new(store.clone());
        let identity = Identity::new("ghost");

        let err = service
            .update_profile(&identity, &ProfileEdit::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service.update_photo(&identity, "url").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.writes(), 0);
    }
}
