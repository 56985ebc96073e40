//! Account deletion.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::{AccountRepository, ProfileRepository};

pub const MISSING_UID_MESSAGE: &str = "Missing uid";

/// Removes a user's authentication account and profile record.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { accounts, profiles }
    }

    /// Deletes the authentication account, then the profile record.
    ///
    /// The steps run in order and stop at the first failure. Nothing is
    /// rolled back: if the profile delete fails the account stays deleted.
    ///
    /// # Errors
    /// - `BadRequest` if `uid` is empty; nothing is deleted
    /// - The failing step's error otherwise
    pub async fn delete_user(&self, uid: &str) -> AppResult<()> {
        if uid.is_empty() {
            return Err(AppError::BadRequest {
                message: MISSING_UID_MESSAGE.to_string(),
            });
        }

        self.accounts.delete_account(uid).await?;
        tracing::info!(uid, "Authentication account deleted");

        self.profiles.delete(uid).await?;
        tracing::info!(uid, "Profile record deleted");

        Ok(())
    }
}
