//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Upstream → 500 INTERNAL_SERVER_ERROR (the platform retries the event)
    /// - Credentials → 500 INTERNAL_SERVER_ERROR
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, None)
    }
}

fn error_parts(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(field, reason),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::Upstream {
            service,
            status,
            message,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("UPSTREAM_ERROR", message).with_details(json!({
                "service": service,
                "status": status,
            })),
        ),
        AppError::Credentials { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CREDENTIALS_ERROR", "Platform credentials unavailable"),
        ),
        AppError::Configuration { key, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
                .with_details(json!({
                    "key": key
                })),
        ),
        AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
        ),
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    error_parts(error).0
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Upstream { .. } => "UPSTREAM_ERROR",
        AppError::Credentials { .. } => "CREDENTIALS_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Error response that carries the request ID when one is known.
///
/// # Arguments
/// * `error` - The AppError to convert
/// * `request_id` - Optional request ID for correlation
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let (status, mut error_response) = error_parts(&error);

    if let Some(id) = request_id {
        error_response = error_response.with_request_id(&id);
    }

    (status, Json(error_response)).into_response()
}
