//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the push provider and handlers.

mod account_service;
mod booking_service;
pub mod notifications;

pub use account_service::{AccountService, MISSING_UID_MESSAGE};
pub use booking_service::{
    BOOKING_ID_KEY, BookingNotifier, NEW_BOOKING_TITLE, NotifyOutcome, STATUS_UPDATED_TITLE,
    SkipReason,
};

use std::sync::Arc;

use crate::repositories::Repositories;
use notifications::PushProvider;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub bookings: BookingNotifier,
    pub accounts: AccountService,
}

impl Services {
    /// Creates a new Services instance from Repositories and a push provider.
    pub fn new(
        repos: Repositories,
        push: Arc<dyn PushProvider>,
        admin_user_id: impl Into<String>,
    ) -> Self {
        Self {
            bookings: BookingNotifier::new(repos.profiles.clone(), push, admin_user_id),
            accounts: AccountService::new(repos.accounts, repos.profiles),
        }
    }
}
