//! Firebase Cloud Messaging provider implementation.
//!
//! Sends notifications through the FCM HTTP v1 API
//! (`POST /v1/projects/{project}/messages:send`).

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::provider::{PushMessage, PushProvider, PushReceipt};
use crate::config::FirebaseConfig;
use crate::error::AppResult;
use crate::external::google::{
    AccessTokenProvider, MESSAGING_SERVICE, endpoint, error_from_response, transport_error,
};

/// FCM HTTP v1 provider
///
/// # Example
/// ```ignore
/// let provider = FcmProvider::new(HTTP_CLIENT.clone(), tokens, &settings.firebase);
/// let receipt = provider.send(&message).await?;
/// ```
#[derive(Clone)]
pub struct FcmProvider {
    http: reqwest::Client,
    tokens: Arc<AccessTokenProvider>,
    base_url: String,
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    /// `projects/{project}/messages/{message_id}`
    #[serde(default)]
    name: String,
}

impl FcmProvider {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokenProvider>,
        config: &FirebaseConfig,
    ) -> Self {
        Self {
            http,
            tokens,
            base_url: config.messaging_url.clone(),
            project_id: config.project_id.clone(),
        }
    }

    /// Builds the `messages:send` request body
    fn build_request_body(message: &PushMessage) -> serde_json::Value {
        let mut body = json!({
            "message": {
                "token": message.token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
            }
        });

        if !message.data.is_empty() {
            body["message"]["data"] = json!(message.data);
        }

        body
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send(&self, message: &PushMessage) -> AppResult<PushReceipt> {
        let start = Instant::now();

        let url = endpoint(
            &self.base_url,
            ["v1", "projects", self.project_id.as_str(), "messages:send"],
        )?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&Self::build_request_body(message))
            .send()
            .await
            .map_err(|e| transport_error(MESSAGING_SERVICE, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(MESSAGING_SERVICE, response).await);
        }

        let sent = response
            .json::<SendResponse>()
            .await
            .map_err(|e| transport_error(MESSAGING_SERVICE, e))?;

        Ok(PushReceipt {
            message_id: sent.name,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::google::TokenSource;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEND_PATH: &str = "/v1/projects/salon-test/messages:send";

    fn message() -> PushMessage {
        PushMessage {
            token: "device-token".to_string(),
            title: "Booking Status Updated".to_string(),
            body: "Your booking at Downtown is now confirmed. Slot: 10:00".to_string(),
            data: BTreeMap::from([("bookingId".to_string(), "b1".to_string())]),
        }
    }

    fn provider(server: &MockServer) -> FcmProvider {
        let config = FirebaseConfig {
            project_id: "salon-test".to_string(),
            messaging_url: server.uri(),
            ..Default::default()
        };
        let tokens = Arc::new(AccessTokenProvider::new(
            reqwest::Client::new(),
            TokenSource::Emulator,
        ));
        FcmProvider::new(reqwest::Client::new(), tokens, &config)
    }

    #[test]
    fn test_build_request_body() {
        let body = FcmProvider::build_request_body(&message());
        assert_eq!(body["message"]["token"], "device-token");
        assert_eq!(body["message"]["notification"]["title"], "Booking Status Updated");
        assert_eq!(body["message"]["data"]["bookingId"], "b1");
    }

    #[test]
    fn test_build_request_body_without_data() {
        let message = PushMessage {
            data: BTreeMap::new(),
            ..message()
        };
        let body = FcmProvider::build_request_body(&message);
        assert!(body["message"].get("data").is_none());
    }

    #[test]
    fn test_debug_omits_device_token() {
        assert!(!format!("{:?}", message()).contains("device-token"));
    }

    #[tokio::test]
    async fn test_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer owner"))
            .and(body_json(json!({
                "message": {
                    "token": "device-token",
                    "notification": {
                        "title": "Booking Status Updated",
                        "body": "Your booking at Downtown is now confirmed. Slot: 10:00"
                    },
                    "data": {"bookingId": "b1"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/salon-test/messages/0:1234"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = provider(&server).send(&message()).await.unwrap();
        assert_eq!(receipt.message_id, "projects/salon-test/messages/0:1234");
    }

    #[tokio::test]
    async fn test_send_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "Requested entity was not found.",
                    "status": "NOT_FOUND"
                }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).send(&message()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream { service: "fcm", status: Some(404), .. }
        ));
        assert_eq!(err.to_string(), "Requested entity was not found.");
    }
}
