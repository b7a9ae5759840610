use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag describing the shape of an edit's value, as the content service
/// expects it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    PlainText,
    ImageReference,
    RichText,
    List,
    StructuredJson,
}

/// The new content carried by one edit. Adjacently tagged so it serializes
/// as `{"kind": "...", "value": ...}` inside the save payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum ChangeValue {
    PlainText(String),
    ImageReference(String),
    RichText(String),
    List(Vec<String>),
    StructuredJson(Value),
}

impl ChangeValue {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeValue::PlainText(_) => ChangeKind::PlainText,
            ChangeValue::ImageReference(_) => ChangeKind::ImageReference,
            ChangeValue::RichText(_) => ChangeKind::RichText,
            ChangeValue::List(_) => ChangeKind::List,
            ChangeValue::StructuredJson(_) => ChangeKind::StructuredJson,
        }
    }
}

/// One uncommitted edit. The buffer keys entries by `id`; recording a second
/// change with the same id replaces the first wholesale (last write wins).
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    /// Opaque key chosen by the renderer, unique among pending changes.
    pub id: String,
    /// Target content unit in the content service. Part of the request
    /// address, never of the body.
    pub content_id: i64,
    pub value: ChangeValue,
    /// Opaque side-channel data forwarded verbatim to the content service.
    pub metadata: Option<Value>,
    /// Creation time, for ordering and debugging only.
    pub recorded_at: DateTime<Utc>,
}

impl PendingChange {
    pub fn new(id: impl Into<String>, content_id: i64, value: ChangeValue) -> Self {
        Self {
            id: id.into(),
            content_id,
            value,
            metadata: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Wire body for the content service save request.
    pub fn payload(&self) -> ChangePayload {
        ChangePayload {
            value: self.value.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// JSON body of a single save request: `{kind, value, metadata}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePayload {
    #[serde(flatten)]
    pub value: ChangeValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_carries_kind_and_value() {
        let change = PendingChange::new(
            "home.welcome",
            42,
            ChangeValue::PlainText("Welcome to the troop!".to_string()),
        );

        let body = serde_json::to_value(change.payload()).unwrap();
        assert_eq!(
            body,
            json!({ "kind": "plain-text", "value": "Welcome to the troop!" })
        );
    }

    #[test]
    fn payload_includes_metadata_when_present() {
        let change = PendingChange::new(
            "gallery.header",
            7,
            ChangeValue::ImageReference("uploads/camp-2026.jpg".to_string()),
        )
        .with_metadata(json!({ "alt": "Summer camp group photo" }));

        let body = serde_json::to_value(change.payload()).unwrap();
        assert_eq!(body["kind"], "image-reference");
        assert_eq!(body["metadata"]["alt"], "Summer camp group photo");
    }

    #[test]
    fn kind_matches_value_variant() {
        let value = ChangeValue::List(vec!["Mon".into(), "Wed".into()]);
        assert_eq!(value.kind(), ChangeKind::List);
    }
}
