//! Google Cloud / Firebase REST clients.
//!
//! Every client shares the same shape: a `reqwest::Client`, an
//! [`AccessTokenProvider`] for bearer tokens and a configurable base URL so
//! the emulator suite or a mock server can stand in for production.

mod credentials;
mod firestore;
mod identity;

pub use credentials::{AccessTokenProvider, ServiceAccountKey, TokenSource};
pub use firestore::FirestoreClient;
pub use identity::{IdentityToolkitClient, USER_NOT_FOUND_MESSAGE};

use reqwest::{Response, Url};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const FIRESTORE_SERVICE: &str = "firestore";
pub const IDENTITY_SERVICE: &str = "identitytoolkit";
pub const MESSAGING_SERVICE: &str = "fcm";
pub const OAUTH_SERVICE: &str = "oauth2";

/// Appends path segments to an API base URL, percent-encoding each one.
pub(crate) fn endpoint<I, S>(base: &str, segments: I) -> AppResult<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = Url::parse(base)
        .map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {}", base, e))?;

    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("API base URL '{}' cannot carry a path", base))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GoogleApiError,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

pub(crate) fn parse_error_body(body: &str) -> Option<GoogleApiError> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}

/// Turns a non-success response into an upstream error carrying the API's message.
pub(crate) async fn error_from_response(service: &'static str, response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = parse_error_body(&body)
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("{} request failed with status {}", service, status));

    AppError::upstream(service, Some(status.as_u16()), message)
}

/// The request never produced a response (DNS, connect, timeout, body decode).
pub(crate) fn transport_error(service: &'static str, error: reqwest::Error) -> AppError {
    AppError::upstream(
        service,
        error.status().map(|status| status.as_u16()),
        format!("{} request failed: {}", service, error),
    )
}
