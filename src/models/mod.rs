mod booking;
mod document;
mod profile;

pub use booking::{Booking, MISSING_FIELD};
pub use document::{
    ArrayValue, Document, DocumentEventData, DocumentMask, DocumentPath, FieldValue,
    FirestoreEventType, GeoPoint, MapValue,
};
pub use profile::UserProfile;
