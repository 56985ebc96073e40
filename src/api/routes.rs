//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware (runs second) - logs requests with request IDs
///
/// No router-wide timeout is applied: a deletion must not be abandoned between
/// its steps. Each outbound call is bounded by the HTTP client's own timeout,
/// which surfaces as an upstream error.
///
/// # Routes
/// - `POST /events/firestore` - Firestore document events
/// - `POST /delete-user` - Account deletion
/// - `GET /health`, `GET /health/live` - Health probes
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .merge(handlers::events::event_routes())
        .merge(handlers::accounts::account_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, api))
        // Middleware is applied in reverse order - last added runs first
        // So logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
