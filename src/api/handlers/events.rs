//! Firestore document event receiver.
//!
//! Eventarc delivers `google.cloud.firestore.document.v1.*` CloudEvents in
//! binary mode: the attributes arrive as `ce-*` headers and the body is the
//! JSON-encoded `DocumentEventData`.
//!
//! Eventarc encodes Firestore payloads as protobuf unless told otherwise, so
//! the trigger must be created with
//! `--event-data-content-type=application/json`. Protobuf bodies are rejected
//! with 400.

use axum::{
    Extension,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::EVENTS_TAG;
use crate::api::dto::ErrorResponse;
use crate::api::middleware::{RequestId, error_to_response_with_request_id, error_to_status_code};
use crate::error::{AppError, AppResult};
use crate::models::{Booking, Document, DocumentEventData, DocumentPath, FirestoreEventType};
use crate::services::NotifyOutcome;
use crate::state::AppState;

pub const CE_TYPE_HEADER: &str = "ce-type";
pub const CE_SUBJECT_HEADER: &str = "ce-subject";
pub const CE_ID_HEADER: &str = "ce-id";

pub fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(receive_firestore_event))
}

/// POST /events/firestore - Receive a Firestore document CloudEvent.
///
/// Created and updated events on the bookings collection trigger
/// notifications. Every other event is acknowledged and dropped.
#[utoipa::path(
    post,
    path = "/events/firestore",
    tag = EVENTS_TAG,
    params(
        ("ce-type" = String, Header, description = "CloudEvent type"),
        ("ce-subject" = Option<String>, Header, description = "Document path, e.g. documents/bookings/{id}"),
        ("ce-id" = Option<String>, Header, description = "CloudEvent id")
    ),
    request_body(content = String, description = "JSON-encoded DocumentEventData", content_type = "application/json"),
    responses(
        (status = 204, description = "Event handled or ignored"),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 500, description = "Handling failed; the platform may redeliver", body = ErrorResponse)
    )
)]
async fn receive_firestore_event(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event_id = header_str(&headers, CE_ID_HEADER).unwrap_or("unknown").to_string();

    match handle_event(&state, &headers, &body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            if error_to_status_code(&e).is_server_error() {
                tracing::error!(event_id = %event_id, error = %e, "Firestore event handling failed");
            } else {
                tracing::warn!(event_id = %event_id, error = %e, "Rejected Firestore event");
            }
            error_to_response_with_request_id(e, request_id.map(|Extension(id)| id.0))
        }
    }
}

async fn handle_event(state: &AppState, headers: &HeaderMap, body: &[u8]) -> AppResult<()> {
    let ce_type = header_str(headers, CE_TYPE_HEADER).ok_or_else(|| bad_request("Missing ce-type header"))?;

    let event_type = match FirestoreEventType::from_ce_type(ce_type) {
        Some(event_type @ (FirestoreEventType::Created | FirestoreEventType::Updated)) => event_type,
        Some(other) => {
            tracing::debug!(ce_type, event_type = other.as_str(), "Ignoring event type");
            return Ok(());
        }
        None => {
            tracing::warn!(ce_type, "Ignoring unrecognised event type");
            return Ok(());
        }
    };

    let data: DocumentEventData = serde_json::from_slice(body)
        .map_err(|e| bad_request(format!("Malformed Firestore event payload: {}", e)))?;

    let path = event_document_path(&data, header_str(headers, CE_SUBJECT_HEADER))
        .ok_or_else(|| bad_request("Event does not name a document"))?;

    if path.collection != state.firebase.bookings_collection {
        tracing::debug!(collection = path.collection, "Ignoring event outside the bookings collection");
        return Ok(());
    }

    let booking_id = path.id;
    let notifier = &state.services.bookings;

    let outcome = match event_type {
        FirestoreEventType::Created => {
            let created = data
                .value
                .as_ref()
                .ok_or_else(|| bad_request("Created event carries no document"))?;
            notifier
                .notify_booking_created(booking_id, &Booking::from_document(created))
                .await?
        }
        _ => {
            let after = data
                .value
                .as_ref()
                .ok_or_else(|| bad_request("Updated event carries no document"))?;
            let before = data
                .old_value
                .as_ref()
                .map(Booking::from_document)
                .unwrap_or_default();
            notifier
                .notify_status_changed(booking_id, &before, &Booking::from_document(after))
                .await?
        }
    };

    if let NotifyOutcome::Skipped(reason) = outcome {
        tracing::debug!(
            booking_id,
            event = event_type.as_str(),
            reason = reason.as_str(),
            "No notification sent"
        );
    }

    Ok(())
}

/// Document named by the event: the new value, then the old value, then
/// the `ce-subject` header.
fn event_document_path<'a>(
    data: &'a DocumentEventData,
    subject: Option<&'a str>,
) -> Option<DocumentPath<'a>> {
    data.value
        .as_ref()
        .and_then(Document::path)
        .or_else(|| data.old_value.as_ref().and_then(Document::path))
        .or_else(|| subject.and_then(DocumentPath::parse))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::BadRequest {
        message: message.into(),
    }
}
