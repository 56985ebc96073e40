use utoipa::OpenApi;

pub const ACCOUNTS_TAG: &str = "Accounts";
pub const EVENTS_TAG: &str = "Events";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking Relay",
        description = "Push notifications for salon bookings and account cleanup on Firebase",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = ACCOUNTS_TAG, description = "Account deletion"),
        (name = EVENTS_TAG, description = "Firestore document events delivered by Eventarc"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
