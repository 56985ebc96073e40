use super::document::{Document, FieldValue};

/// Rendered in place of a field the booking does not carry.
pub const MISSING_FIELD: &str = "unknown";

/// Booking fields read by the notifiers.
///
/// Bookings are written by the client apps; every field is optional here and
/// keeps its original Firestore type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Booking {
    pub user_id: Option<FieldValue>,
    pub branch: Option<FieldValue>,
    pub time_slot: Option<FieldValue>,
    pub user_name: Option<FieldValue>,
    pub status: Option<FieldValue>,
}

impl Booking {
    pub const USER_ID: &'static str = "userId";
    pub const BRANCH: &'static str = "branch";
    pub const TIME_SLOT: &'static str = "timeSlot";
    pub const USER_NAME: &'static str = "userName";
    pub const STATUS: &'static str = "status";

    pub fn from_document(document: &Document) -> Self {
        let field = |key: &str| document.field(key).cloned();
        Self {
            user_id: field(Self::USER_ID),
            branch: field(Self::BRANCH),
            time_slot: field(Self::TIME_SLOT),
            user_name: field(Self::USER_NAME),
            status: field(Self::STATUS),
        }
    }

    /// Id of the owning user, when stored as a non-empty string.
    pub fn owner_id(&self) -> Option<&str> {
        self.user_id
            .as_ref()
            .and_then(FieldValue::as_str)
            .filter(|id| !id.is_empty())
    }

    /// A status appearing, disappearing or changing value all count.
    pub fn status_changed(before: &Booking, after: &Booking) -> bool {
        before.status != after.status
    }

    /// `Branch: {branch}, Name: {userName}, Slot: {timeSlot}`
    pub fn request_summary(&self) -> String {
        format!(
            "Branch: {}, Name: {}, Slot: {}",
            display(&self.branch),
            display(&self.user_name),
            display(&self.time_slot)
        )
    }

    /// `Your booking at {branch} is now {status}. Slot: {timeSlot}`
    pub fn status_summary(&self) -> String {
        format!(
            "Your booking at {} is now {}. Slot: {}",
            display(&self.branch),
            display(&self.status),
            display(&self.time_slot)
        )
    }
}

fn display(value: &Option<FieldValue>) -> String {
    value
        .as_ref()
        .map(FieldValue::render)
        .unwrap_or_else(|| MISSING_FIELD.to_string())
}
