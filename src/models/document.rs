//! Firestore document representation shared by the REST API and Eventarc payloads.
//!
//! Field values arrive wrapped in a single-key object naming their type
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). They are decoded
//! into [`FieldValue`] and rendered back to plain text for notification bodies.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// A single typed Firestore value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    NullValue(()),
    BooleanValue(bool),
    /// int64 is transported as a decimal string
    IntegerValue(#[serde(deserialize_with = "number_or_string")] i64),
    /// Non-finite doubles are transported as `"NaN"`, `"Infinity"`, `"-Infinity"`
    DoubleValue(#[serde(deserialize_with = "number_or_string")] f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// An empty array is encoded as `{}`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

impl FieldValue {
    /// Returns the inner string for `stringValue` fields only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::StringValue(value) => Some(value),
            _ => None,
        }
    }

    /// Plain-text rendering used when interpolating into notification text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::NullValue(()) => f.write_str("null"),
            FieldValue::BooleanValue(value) => write!(f, "{value}"),
            FieldValue::IntegerValue(value) => write!(f, "{value}"),
            FieldValue::DoubleValue(value) => write!(f, "{value}"),
            FieldValue::TimestampValue(value)
            | FieldValue::StringValue(value)
            | FieldValue::BytesValue(value)
            | FieldValue::ReferenceValue(value) => f.write_str(value),
            FieldValue::GeoPointValue(point) => {
                write!(f, "{}, {}", point.latitude, point.longitude)
            }
            FieldValue::ArrayValue(array) => {
                for (index, value) in array.values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            FieldValue::MapValue(map) => {
                f.write_str("{")?;
                for (index, (key, value)) in map.fields.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A Firestore document as returned by `documents.get` or carried in an event.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name,
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,

    #[serde(default)]
    pub create_time: Option<String>,

    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(FieldValue::as_str)
    }

    pub fn path(&self) -> Option<DocumentPath<'_>> {
        DocumentPath::parse(&self.name)
    }
}

/// The `{collection}/{id}` tail of a document resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentPath<'a> {
    pub collection: &'a str,
    pub id: &'a str,
}

impl<'a> DocumentPath<'a> {
    /// Accepts a full resource name or an Eventarc subject
    /// (`documents/bookings/abc`). Nested collections resolve to the
    /// innermost collection.
    pub fn parse(name: &'a str) -> Option<Self> {
        let segments: Vec<&str> = name.split('/').collect();
        let start = segments.iter().position(|segment| *segment == "documents")? + 1;
        let relative = &segments[start..];

        if relative.len() < 2 || relative.len() % 2 != 0 {
            return None;
        }
        if relative.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        Some(Self {
            collection: relative[relative.len() - 2],
            id: relative[relative.len() - 1],
        })
    }
}

/// Field paths touched by an update event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMask {
    #[serde(default)]
    pub field_paths: Vec<String>,
}

/// Body of a `google.cloud.firestore.document.v1.*` CloudEvent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    /// Document state after the change, absent for deletes
    #[serde(default)]
    pub value: Option<Document>,

    /// Document state before the change, absent for creates
    #[serde(default)]
    pub old_value: Option<Document>,

    #[serde(default)]
    pub update_mask: Option<DocumentMask>,
}

/// Firestore CloudEvent types, keyed by the `ce-type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirestoreEventType {
    Created,
    Updated,
    Deleted,
    Written,
}

impl FirestoreEventType {
    const PREFIX: &'static str = "google.cloud.firestore.document.v1.";
    const AUTH_CONTEXT_SUFFIX: &'static str = ".withAuthContext";

    /// Parses a `ce-type`. The `.withAuthContext` variants carry the same
    /// payload and map to the same event type.
    pub fn from_ce_type(ce_type: &str) -> Option<Self> {
        let kind = ce_type.strip_prefix(Self::PREFIX)?;
        match kind.strip_suffix(Self::AUTH_CONTEXT_SUFFIX).unwrap_or(kind) {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "written" => Some(Self::Written),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Written => "written",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(raw: serde_json::Value) -> FieldValue {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_decode_scalar_values() {
        assert_eq!(
            value(json!({"stringValue": "Downtown"})),
            FieldValue::StringValue("Downtown".to_string())
        );
        assert_eq!(value(json!({"integerValue": "42"})), FieldValue::IntegerValue(42));
        assert_eq!(value(json!({"integerValue": 7})), FieldValue::IntegerValue(7));
        assert_eq!(value(json!({"doubleValue": 1.5})), FieldValue::DoubleValue(1.5));
        assert_eq!(value(json!({"booleanValue": true})), FieldValue::BooleanValue(true));
        assert_eq!(value(json!({"nullValue": null})), FieldValue::NullValue(()));
    }

    #[test]
    fn test_decode_non_finite_double() {
        match value(json!({"doubleValue": "Infinity"})) {
            FieldValue::DoubleValue(v) => assert!(v.is_infinite()),
            other => panic!("Expected DoubleValue, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_wrapper() {
        let result = serde_json::from_value::<FieldValue>(json!({"decimalValue": "1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_render_values() {
        assert_eq!(value(json!({"stringValue": "10:00"})).render(), "10:00");
        assert_eq!(value(json!({"integerValue": "1030"})).render(), "1030");
        assert_eq!(value(json!({"doubleValue": 2.0})).render(), "2");
        assert_eq!(value(json!({"booleanValue": false})).render(), "false");
        assert_eq!(value(json!({"nullValue": null})).render(), "null");
        assert_eq!(
            value(json!({"timestampValue": "2026-03-01T10:00:00Z"})).render(),
            "2026-03-01T10:00:00Z"
        );
        assert_eq!(
            value(json!({"arrayValue": {"values": [{"stringValue": "a"}, {"integerValue": "2"}]}}))
                .render(),
            "a,2"
        );
        assert_eq!(value(json!({"arrayValue": {}})).render(), "");
        assert_eq!(
            value(json!({"mapValue": {"fields": {"b": {"stringValue": "x"}, "a": {"integerValue": "1"}}}}))
                .render(),
            "{a: 1, b: x}"
        );
    }

    #[test]
    fn test_document_accessors() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/admin",
            "fields": {
                "fcmToken": {"stringValue": "token-1"},
                "age": {"integerValue": "30"}
            },
            "createTime": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(doc.string_field("fcmToken"), Some("token-1"));
        assert_eq!(doc.string_field("age"), None);
        assert_eq!(doc.field("age"), Some(&FieldValue::IntegerValue(30)));
        assert_eq!(
            doc.path(),
            Some(DocumentPath {
                collection: "users",
                id: "admin"
            })
        );
    }

    #[test]
    fn test_document_path_parse() {
        assert_eq!(
            DocumentPath::parse("documents/bookings/b1"),
            Some(DocumentPath {
                collection: "bookings",
                id: "b1"
            })
        );
        assert_eq!(
            DocumentPath::parse("projects/p/databases/d/documents/salons/s1/bookings/b2"),
            Some(DocumentPath {
                collection: "bookings",
                id: "b2"
            })
        );
        assert_eq!(DocumentPath::parse("projects/p/databases/d/documents/bookings"), None);
        assert_eq!(DocumentPath::parse("bookings/b1"), None);
        assert_eq!(DocumentPath::parse("documents/bookings/"), None);
        assert_eq!(DocumentPath::parse(""), None);
    }

    #[test]
    fn test_event_data_decodes_update() {
        let data: DocumentEventData = serde_json::from_value(json!({
            "oldValue": {
                "name": "projects/p/databases/d/documents/bookings/b1",
                "fields": {"status": {"stringValue": "pending"}}
            },
            "value": {
                "name": "projects/p/databases/d/documents/bookings/b1",
                "fields": {"status": {"stringValue": "confirmed"}}
            },
            "updateMask": {"fieldPaths": ["status"]}
        }))
        .unwrap();

        assert_eq!(
            data.old_value.unwrap().string_field("status"),
            Some("pending")
        );
        assert_eq!(data.value.unwrap().string_field("status"), Some("confirmed"));
        assert_eq!(data.update_mask.unwrap().field_paths, vec!["status"]);
    }

    #[test]
    fn test_event_type_from_ce_type() {
        assert_eq!(
            FirestoreEventType::from_ce_type("google.cloud.firestore.document.v1.created"),
            Some(FirestoreEventType::Created)
        );
        assert_eq!(
            FirestoreEventType::from_ce_type("google.cloud.firestore.document.v1.updated"),
            Some(FirestoreEventType::Updated)
        );
        assert_eq!(
            FirestoreEventType::from_ce_type("google.cloud.firestore.document.v1.created.withAuthContext"),
            Some(FirestoreEventType::Created)
        );
        assert_eq!(
            FirestoreEventType::from_ce_type("google.cloud.firestore.document.v1.updated.withAuthContext"),
            Some(FirestoreEventType::Updated)
        );
        assert_eq!(
            FirestoreEventType::from_ce_type("google.cloud.firestore.document.v1.created.withSomethingElse"),
            None
        );
        assert_eq!(FirestoreEventType::from_ce_type("google.cloud.pubsub.topic.v1.messagePublished"), None);
    }
}
