use std::sync::Arc;

use serde::Serialize;

use super::{
    AccessTokenProvider, IDENTITY_SERVICE, endpoint, error_from_response, transport_error,
};
use crate::config::FirebaseConfig;
use crate::error::{AppError, AppResult};

/// Message reported when the account to delete does not exist
pub const USER_NOT_FOUND_MESSAGE: &str =
    "There is no user record corresponding to the provided identifier.";

/// Identity Toolkit (Firebase Authentication) admin client.
#[derive(Clone, Debug)]
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    tokens: Arc<AccessTokenProvider>,
    base_url: String,
    project_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    local_id: &'a str,
}

impl IdentityToolkitClient {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokenProvider>,
        config: &FirebaseConfig,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: config.auth_url.clone(),
            project_id: config.project_id.clone(),
        }
    }

    /// `POST /v1/projects/{project}/accounts:delete`
    pub async fn delete_account(&self, uid: &str) -> AppResult<()> {
        let url = endpoint(
            &self.base_url,
            ["v1", "projects", self.project_id.as_str(), "accounts:delete"],
        )?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&DeleteAccountRequest { local_id: uid })
            .send()
            .await
            .map_err(|e| transport_error(IDENTITY_SERVICE, e))?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(match error_from_response(IDENTITY_SERVICE, response).await {
            // The API answers with a bare code, optionally followed by " : detail"
            AppError::Upstream {
                service,
                status,
                message,
            } if message.starts_with("USER_NOT_FOUND") => AppError::Upstream {
                service,
                status,
                message: USER_NOT_FOUND_MESSAGE.to_string(),
            },
            other => other,
        })
    }
}
