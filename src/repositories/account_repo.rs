//! Authentication account repository backed by Identity Toolkit.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::external::google::IdentityToolkitClient;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Deletes the authentication account with the given uid.
    async fn delete_account(&self, uid: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct FirebaseAccountRepository {
    client: IdentityToolkitClient,
}

impl FirebaseAccountRepository {
    pub fn new(client: IdentityToolkitClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountRepository for FirebaseAccountRepository {
    async fn delete_account(&self, uid: &str) -> AppResult<()> {
        self.client.delete_account(uid).await
    }
}
