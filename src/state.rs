//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::FirebaseConfig;
use crate::error::AppResult;
use crate::external::client::HTTP_CLIENT;
use crate::external::google::AccessTokenProvider;
use crate::repositories::Repositories;
use crate::services::Services;
use crate::services::notifications::FcmProvider;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since every service holds its collaborators behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Project and collection layout, used to route incoming events
    pub firebase: FirebaseConfig,
}

impl AppState {
    /// Creates the platform clients once and wires them into the services.
    ///
    /// # Errors
    /// Fails when the configured service-account key cannot be read.
    ///
    /// # Example
    /// ```ignore
    /// let state = AppState::new(&settings.firebase)?;
    /// ```
    pub fn new(firebase: &FirebaseConfig) -> AppResult<Self> {
        let http = HTTP_CLIENT.clone();
        let tokens = Arc::new(AccessTokenProvider::from_config(http.clone(), firebase)?);
        tracing::info!(source = tokens.source().kind(), "Access token source selected");

        let repos = Repositories::new(http.clone(), tokens.clone(), firebase);
        let push = Arc::new(FcmProvider::new(http, tokens, firebase));
        let services = Services::new(repos, push, firebase.admin_user_id.clone());

        Ok(Self::from_parts(services, firebase.clone()))
    }

    /// Assembles state from already-built services.
    pub fn from_parts(services: Services, firebase: FirebaseConfig) -> Self {
        Self { services, firebase }
    }
}
