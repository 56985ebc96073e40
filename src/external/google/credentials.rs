//! OAuth2 access tokens for the Google APIs.
//!
//! Tokens come from a service-account key (signed JWT assertion exchanged at
//! the key's token URI), from the metadata server of the runtime environment,
//! or, against the emulator suite, a fixed `owner` token.

use std::fmt;
use std::path::Path;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{OAUTH_SERVICE, error_from_response, transport_error};
use crate::config::FirebaseConfig;
use crate::error::{AppError, AppResult};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
                      https://www.googleapis.com/auth/firebase.messaging \
                      https://www.googleapis.com/auth/identitytoolkit";

/// Lifetime requested for signed assertions
const ASSERTION_LIFETIME: SignedDuration = SignedDuration::from_secs(3600);

/// Cached tokens are replaced once they are this close to expiring
const REFRESH_MARGIN: SignedDuration = SignedDuration::from_secs(60);

/// Bearer token accepted by every emulator in the Firebase suite
pub const EMULATOR_TOKEN: &str = "owner";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a downloaded service-account JSON key that token minting needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::credentials(format!("Invalid service account key: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::credentials(format!(
                "Failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Signs the RS256 assertion for the JWT bearer grant.
    fn assertion(&self, now: Timestamp) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now.as_second(),
            exp: now.as_second() + ASSERTION_LIFETIME.as_secs(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| AppError::credentials(format!("Invalid service account private key: {}", e)))?;

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| AppError::credentials(format!("Failed to sign token assertion: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Where access tokens come from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    ServiceAccount(ServiceAccountKey),
    /// `GET` on the metadata server's token endpoint with `Metadata-Flavor: Google`
    Metadata { url: String },
    Emulator,
}

impl TokenSource {
    pub fn kind(&self) -> &'static str {
        match self {
            TokenSource::ServiceAccount(_) => "service_account",
            TokenSource::Metadata { .. } => "metadata_server",
            TokenSource::Emulator => "emulator",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Timestamp,
}

impl CachedToken {
    fn is_fresh(&self, now: Timestamp) -> bool {
        now.saturating_add(REFRESH_MARGIN)
            .map(|deadline| deadline < self.expires_at)
            .unwrap_or(false)
    }
}

/// Hands out bearer tokens, fetching a new one only when the cached token
/// is missing or about to expire.
#[derive(Debug)]
pub struct AccessTokenProvider {
    http: reqwest::Client,
    source: TokenSource,
    cached: Mutex<Option<CachedToken>>,
}

impl AccessTokenProvider {
    pub fn new(http: reqwest::Client, source: TokenSource) -> Self {
        Self {
            http,
            source,
            cached: Mutex::new(None),
        }
    }

    /// Picks the token source from configuration: emulator, then an explicit
    /// key file, then the metadata server.
    pub fn from_config(http: reqwest::Client, config: &FirebaseConfig) -> AppResult<Self> {
        let source = if config.emulator {
            TokenSource::Emulator
        } else if let Some(path) = &config.credentials_file {
            TokenSource::ServiceAccount(ServiceAccountKey::from_file(path)?)
        } else {
            TokenSource::Metadata {
                url: config.metadata_token_url.clone(),
            }
        };

        Ok(Self::new(http, source))
    }

    pub fn source(&self) -> &TokenSource {
        &self.source
    }

    pub async fn access_token(&self) -> AppResult<String> {
        if matches!(self.source, TokenSource::Emulator) {
            return Ok(EMULATOR_TOKEN.to_string());
        }

        let mut cached = self.cached.lock().await;
        let now = Timestamp::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let response = self.fetch(now).await?;
        let expires_at = now
            .saturating_add(SignedDuration::from_secs(response.expires_in))
            .map_err(|e| AppError::credentials(format!("Invalid token lifetime: {}", e)))?;

        tracing::debug!(
            source = self.source.kind(),
            expires_in = response.expires_in,
            "Fetched access token"
        );

        let value = response.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    async fn fetch(&self, now: Timestamp) -> AppResult<TokenResponse> {
        let request = match &self.source {
            TokenSource::ServiceAccount(key) => {
                let assertion = key.assertion(now)?;
                self.http.post(&key.token_uri).form(&[
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ])
            }
            TokenSource::Metadata { url } => self.http.get(url).header("Metadata-Flavor", "Google"),
            TokenSource::Emulator => {
                return Ok(TokenResponse {
                    access_token: EMULATOR_TOKEN.to_string(),
                    expires_in: default_expires_in(),
                });
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(OAUTH_SERVICE, e))?;

        if !response.status().is_success() {
            let error = error_from_response(OAUTH_SERVICE, response).await;
            return Err(AppError::credentials(format!(
                "Access token request failed: {}",
                error
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::credentials(format!("Malformed token response: {}", e)))
    }
}
