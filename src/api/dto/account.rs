//! Account deletion DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `POST /delete-user` body.
///
/// The handler reads `uid` leniently, so this type only documents the shape.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    /// Id of the user to delete
    #[schema(example = "kX2b9cQe0fTzY3")]
    pub uid: String,
}

/// Outcome of a delete-user request.
///
/// Exactly one of `message` (on success) or `error` is present.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[schema(example = json!({
    "success": true,
    "message": "User kX2b9cQe0fTzY3 deleted from Auth and Firestore."
}))]
pub struct DeleteUserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteUserResponse {
    pub fn deleted(uid: &str) -> Self {
        Self {
            success: true,
            message: Some(format!("User {} deleted from Auth and Firestore.", uid)),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
