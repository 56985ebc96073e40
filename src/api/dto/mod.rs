//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `account` - Account deletion request/response
//! - `error` - Common error response DTOs
//! - `health` - Health check responses

mod account;
mod error;
mod health;

pub use account::{DeleteUserRequest, DeleteUserResponse};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
