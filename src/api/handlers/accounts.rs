//! Account deletion endpoint.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ACCOUNTS_TAG;
use crate::api::dto::{DeleteUserRequest, DeleteUserResponse};
use crate::error::AppError;
use crate::state::AppState;

pub fn account_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(delete_user))
}

/// Pulls a non-empty string `uid` out of a JSON object body.
///
/// Anything else (unparsable body, missing or null uid, non-string uid)
/// reads as no uid at all.
fn extract_uid(body: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(body).ok()?;
    body.get("uid")
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
        .map(str::to_string)
}

/// POST /delete-user - Delete a user's authentication account and profile.
///
/// The account goes first. When the profile delete then fails the account
/// stays deleted and the response reports the profile failure.
#[utoipa::path(
    post,
    path = "/delete-user",
    tag = ACCOUNTS_TAG,
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "Account and profile deleted", body = DeleteUserResponse),
        (status = 400, description = "Missing uid", body = DeleteUserResponse),
        (status = 500, description = "A platform call failed", body = DeleteUserResponse)
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<DeleteUserResponse>) {
    let uid = extract_uid(&body).unwrap_or_default();

    match state.services.accounts.delete_user(&uid).await {
        Ok(()) => (StatusCode::OK, Json(DeleteUserResponse::deleted(&uid))),
        Err(AppError::BadRequest { message }) => {
            tracing::warn!(error = %message, "Rejected delete-user request");
            (StatusCode::BAD_REQUEST, Json(DeleteUserResponse::failed(message)))
        }
        Err(e) => {
            tracing::error!(uid = %uid, error = %e, "Failed to delete user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteUserResponse::failed(e.to_string())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryAccounts, InMemoryProfiles, RecordingPush, fake_state};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn state_with(
        accounts: &Arc<InMemoryAccounts>,
        profiles: &Arc<InMemoryProfiles>,
    ) -> AppState {
        fake_state(profiles.clone(), accounts.clone(), Arc::new(RecordingPush::new()))
    }

    #[test]
    fn test_extract_uid() {
        assert_eq!(extract_uid(br#"{"uid":"u1"}"#).as_deref(), Some("u1"));
        assert_eq!(extract_uid(br#"{"uid":""}"#), None);
        assert_eq!(extract_uid(br#"{"uid":null}"#), None);
        assert_eq!(extract_uid(br#"{"uid":42}"#), None);
        assert_eq!(extract_uid(br#"{}"#), None);
        assert_eq!(extract_uid(b""), None);
        assert_eq!(extract_uid(b"uid=u1"), None);
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let accounts = Arc::new(InMemoryAccounts::new().with_account("u1"));
        let profiles = Arc::new(InMemoryProfiles::new().with_profile("u1", Some("tok")));

        let (status, Json(body)) = delete_user(
            State(state_with(&accounts, &profiles)),
            Bytes::from_static(br#"{"uid":"u1"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DeleteUserResponse::deleted("u1"));
        assert!(!accounts.contains("u1"));
        assert!(!profiles.contains("u1"));
    }

    #[tokio::test]
    async fn test_delete_user_profile_failure_reports_500() {
        let accounts = Arc::new(InMemoryAccounts::new().with_account("u1"));
        let profiles = Arc::new(
            InMemoryProfiles::new()
                .with_profile("u1", None)
                .failing_deletes("Firestore unavailable"),
        );

        let (status, Json(body)) = delete_user(
            State(state_with(&accounts, &profiles)),
            Bytes::from_static(br#"{"uid":"u1"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, DeleteUserResponse::failed("Firestore unavailable"));
        assert!(!accounts.contains("u1"));
        assert!(profiles.contains("u1"));
    }

    #[tokio::test]
    async fn test_delete_user_unknown_account_reports_500() {
        let accounts = Arc::new(InMemoryAccounts::new());
        let profiles = Arc::new(InMemoryProfiles::new().with_profile("ghost", None));

        let (status, Json(body)) = delete_user(
            State(state_with(&accounts, &profiles)),
            Bytes::from_static(br#"{"uid":"ghost"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert!(profiles.contains("ghost"));
    }

    proptest! {
        #[test]
        fn prop_bodies_without_uid_delete_nothing(body in prop_oneof![
            Just(r#"{}"#.to_string()),
            Just(r#"{"uid":""}"#.to_string()),
            Just(r#"{"uid":null}"#.to_string()),
            any::<i64>().prop_map(|n| format!(r#"{{"uid":{}}}"#, n)),
            "[a-z]{0,12}",
        ]) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let accounts = Arc::new(InMemoryAccounts::new().with_account("u1"));
            let profiles = Arc::new(InMemoryProfiles::new().with_profile("u1", None));

            let (status, Json(response)) = rt.block_on(delete_user(
                State(state_with(&accounts, &profiles)),
                Bytes::from(body),
            ));

            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
            prop_assert_eq!(response, DeleteUserResponse::failed("Missing uid"));
            prop_assert!(accounts.deleted().is_empty());
            prop_assert!(profiles.deleted().is_empty());
        }
    }
}
