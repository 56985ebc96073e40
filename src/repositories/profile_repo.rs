//! User profile repository backed by a Firestore collection.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::external::google::FirestoreClient;
use crate::models::UserProfile;

/// Read and delete access to user profile records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by user id.
    ///
    /// # Returns
    /// `Some(UserProfile)` if the record exists, `None` otherwise
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Deletes the profile record. Deleting a missing record is not an error.
    async fn delete(&self, user_id: &str) -> AppResult<()>;
}

/// Profiles stored as documents of the configured users collection.
#[derive(Clone)]
pub struct FirestoreProfileRepository {
    client: FirestoreClient,
    collection: String,
}

impl FirestoreProfileRepository {
    pub fn new(client: FirestoreClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl ProfileRepository for FirestoreProfileRepository {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let document = self.client.get_document(&self.collection, user_id).await?;
        Ok(document.map(|document| UserProfile::from_document(user_id, &document)))
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        self.client.delete_document(&self.collection, user_id).await
    }
}
