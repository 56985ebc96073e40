use std::sync::Arc;

use reqwest::StatusCode;

use super::{
    AccessTokenProvider, FIRESTORE_SERVICE, endpoint, error_from_response, transport_error,
};
use crate::config::FirebaseConfig;
use crate::error::AppResult;
use crate::models::Document;

/// Minimal Firestore REST v1 client: single-document reads and deletes.
#[derive(Clone, Debug)]
pub struct FirestoreClient {
    http: reqwest::Client,
    tokens: Arc<AccessTokenProvider>,
    base_url: String,
    project_id: String,
    database_id: String,
}

impl FirestoreClient {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokenProvider>,
        config: &FirebaseConfig,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: config.firestore_url.clone(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> AppResult<reqwest::Url> {
        endpoint(
            &self.base_url,
            [
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
                "documents",
                collection,
                id,
            ],
        )
    }

    /// Reads `{collection}/{id}`. A missing document is `Ok(None)`.
    pub async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let url = self.document_url(collection, id)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(FIRESTORE_SERVICE, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Document>()
                .await
                .map(Some)
                .map_err(|e| transport_error(FIRESTORE_SERVICE, e)),
            _ => Err(error_from_response(FIRESTORE_SERVICE, response).await),
        }
    }

    /// Deletes `{collection}/{id}`. Deleting a missing document succeeds.
    pub async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let url = self.document_url(collection, id)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(FIRESTORE_SERVICE, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(FIRESTORE_SERVICE, response).await)
        }
    }
}
