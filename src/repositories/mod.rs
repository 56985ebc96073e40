//! Repository layer for the records this service reads and deletes.
//!
//! Each repository is a trait object so services can run against the
//! platform APIs in production and in-memory fakes in tests.

mod account_repo;
mod profile_repo;

pub use account_repo::{AccountRepository, FirebaseAccountRepository};
pub use profile_repo::{FirestoreProfileRepository, ProfileRepository};

use std::sync::Arc;

use crate::config::FirebaseConfig;
use crate::external::google::{AccessTokenProvider, FirestoreClient, IdentityToolkitClient};

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap since every repository sits behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Repositories {
    /// Creates the platform-backed repositories.
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client
    /// * `tokens` - Access token provider shared by every API client
    /// * `config` - Firebase project and collection layout
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokenProvider>,
        config: &FirebaseConfig,
    ) -> Self {
        let firestore = FirestoreClient::new(http.clone(), tokens.clone(), config);
        let identity = IdentityToolkitClient::new(http, tokens, config);

        Self {
            profiles: Arc::new(FirestoreProfileRepository::new(
                firestore,
                config.users_collection.clone(),
            )),
            accounts: Arc::new(FirebaseAccountRepository::new(identity)),
        }
    }
}
