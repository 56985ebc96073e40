//! Core push provider trait and types.
//!
//! This module provides the abstraction over the push delivery network so
//! the notifiers can be exercised without talking to the real service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;

/// A single push notification addressed to one device token.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    /// Device registration token
    pub token: String,
    pub title: String,
    pub body: String,
    /// String key/value payload delivered alongside the notification
    pub data: BTreeMap<String, String>,
}

impl std::fmt::Debug for PushMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushMessage")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Result of an accepted send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReceipt {
    /// Provider-assigned message id
    pub message_id: String,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// Trait for push delivery providers.
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use in async contexts.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Sends a push message.
    ///
    /// # Returns
    /// The receipt when the provider accepted the message, or an error
    /// carrying the provider's rejection message
    async fn send(&self, message: &PushMessage) -> AppResult<PushReceipt>;

    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;
}
