//! Booking notifications.
//!
//! Reacts to booking documents being created or updated: looks up the
//! profile that should hear about it and pushes a notification to its
//! delivery token.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::Booking;
use crate::repositories::ProfileRepository;
use crate::services::notifications::{PushMessage, PushProvider};

pub const NEW_BOOKING_TITLE: &str = "New Booking Request";
pub const STATUS_UPDATED_TITLE: &str = "Booking Status Updated";

/// Payload key carrying the booking id
pub const BOOKING_ID_KEY: &str = "bookingId";

/// What a notifier did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent { message_id: String },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    StatusUnchanged,
    /// The updated booking has no usable `userId`
    MissingOwner,
    ProfileMissing,
    NoDeliveryToken,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::StatusUnchanged => "status_unchanged",
            SkipReason::MissingOwner => "missing_owner",
            SkipReason::ProfileMissing => "profile_missing",
            SkipReason::NoDeliveryToken => "no_delivery_token",
        }
    }
}

/// Sends booking notifications to the administrator and to booking owners.
#[derive(Clone)]
pub struct BookingNotifier {
    profiles: Arc<dyn ProfileRepository>,
    push: Arc<dyn PushProvider>,
    admin_user_id: String,
}

impl BookingNotifier {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        push: Arc<dyn PushProvider>,
        admin_user_id: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            push,
            admin_user_id: admin_user_id.into(),
        }
    }

    /// Tells the administrator about a newly created booking.
    ///
    /// # Returns
    /// `Sent` when a push went out, `Skipped` when the admin profile is
    /// missing or has no delivery token
    ///
    /// # Errors
    /// Profile lookup or push delivery failures
    pub async fn notify_booking_created(
        &self,
        booking_id: &str,
        booking: &Booking,
    ) -> AppResult<NotifyOutcome> {
        self.deliver(
            &self.admin_user_id,
            NEW_BOOKING_TITLE,
            booking.request_summary(),
            booking_id,
        )
        .await
    }

    /// Tells the booking owner that the status of their booking changed.
    ///
    /// Only the `status` field is compared; updates to other fields are skipped.
    pub async fn notify_status_changed(
        &self,
        booking_id: &str,
        before: &Booking,
        after: &Booking,
    ) -> AppResult<NotifyOutcome> {
        if !Booking::status_changed(before, after) {
            tracing::debug!(booking_id, "Booking status unchanged, nothing to send");
            return Ok(NotifyOutcome::Skipped(SkipReason::StatusUnchanged));
        }

        let Some(owner_id) = after.owner_id() else {
            tracing::warn!(booking_id, "Booking status changed but it has no userId");
            return Ok(NotifyOutcome::Skipped(SkipReason::MissingOwner));
        };

        self.deliver(
            owner_id,
            STATUS_UPDATED_TITLE,
            after.status_summary(),
            booking_id,
        )
        .await
    }

    async fn deliver(
        &self,
        user_id: &str,
        title: &str,
        body: String,
        booking_id: &str,
    ) -> AppResult<NotifyOutcome> {
        let Some(profile) = self.profiles.find_by_id(user_id).await? else {
            tracing::info!(booking_id, user_id, "Profile not found, skipping notification");
            return Ok(NotifyOutcome::Skipped(SkipReason::ProfileMissing));
        };

        let Some(token) = profile.delivery_token() else {
            tracing::info!(booking_id, user_id, "Profile has no delivery token, skipping notification");
            return Ok(NotifyOutcome::Skipped(SkipReason::NoDeliveryToken));
        };

        let message = PushMessage {
            token: token.to_string(),
            title: title.to_string(),
            body,
            data: BTreeMap::from([(BOOKING_ID_KEY.to_string(), booking_id.to_string())]),
        };

        let receipt = self.push.send(&message).await?;

        tracing::info!(
            booking_id,
            user_id,
            title,
            provider = self.push.name(),
            message_id = %receipt.message_id,
            duration_ms = receipt.duration_ms,
            "Notification sent"
        );

        Ok(NotifyOutcome::Sent {
            message_id: receipt.message_id,
        })
    }
}
