use super::document::Document;

/// A user profile record from the users collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub fcm_token: Option<String>,
}

impl UserProfile {
    pub const FCM_TOKEN: &'static str = "fcmToken";

    pub fn from_document(id: impl Into<String>, document: &Document) -> Self {
        Self {
            id: id.into(),
            fcm_token: document.string_field(Self::FCM_TOKEN).map(str::to_string),
        }
    }

    /// Push token to deliver to, if the profile has a usable one.
    pub fn delivery_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|token| !token.is_empty())
    }
}
