use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::NoteTag;

/// A note as stored by the remote notes service.
///
/// Notes are immutable once created: the client lists and creates them but
/// never edits one in place. Field names follow the service's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Identifier assigned by the service.
    pub id: String,
    /// Short title, 3 to 50 characters.
    pub title: String,
    /// Freeform body, up to 500 characters. May be empty.
    pub content: String,
    /// Category from the fixed tag set.
    pub tag: NoteTag,
    /// When the service created this note.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Payload for the create-note operation.
///
/// Values are validated against the form schema before one of these is
/// built, so an instance always satisfies the field bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    title: String,
    content: String,
    tag: NoteTag,
}

impl NewNote {
    pub(crate) fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag,
        }
    }

    /// Returns the note title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the note tag.
    pub fn tag(&self) -> NoteTag {
        self.tag
    }
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use nota::models::NoteBuilder;
///
/// let note = NoteBuilder::new().id("1").title("Standup agenda").build();
///
/// assert_eq!(note.id, "1");
/// assert_eq!(note.title, "Standup agenda");
/// assert!(note.content.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    tag: Option<NoteTag>,
    created_at: Option<OffsetDateTime>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the note title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the note content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the note tag.
    pub fn tag(mut self, tag: NoteTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Sets the created timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the `Note`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `title` have not been set.
    pub fn build(self) -> Note {
        Note {
            id: self.id.expect("id is required"),
            title: self.title.expect("title is required"),
            content: self.content.unwrap_or_default(),
            tag: self.tag.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn builder_fills_defaults_for_optional_fields() {
        let note = NoteBuilder::new().id("42").title("Groceries").build();

        assert_eq!(note.id, "42");
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "");
        assert_eq!(note.tag, NoteTag::Todo);
    }

    #[test]
    fn builder_allows_setting_all_fields() {
        let when = datetime!(2025-06-01 12:00:00 UTC);
        let note = NoteBuilder::new()
            .id("7")
            .title("Quarterly review")
            .content("Prepare slides")
            .tag(NoteTag::Work)
            .created_at(when)
            .build();

        assert_eq!(note.title, "Quarterly review");
        assert_eq!(note.content, "Prepare slides");
        assert_eq!(note.tag, NoteTag::Work);
        assert_eq!(note.created_at, when);
    }

    #[test]
    fn note_deserializes_from_service_json() {
        let json = r#"{
            "id": "abc123",
            "title": "Weekly sync",
            "content": "Agenda items",
            "tag": "Meeting",
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, "abc123");
        assert_eq!(note.tag, NoteTag::Meeting);
        assert_eq!(note.created_at, datetime!(2025-06-01 12:00:00 UTC));
    }

    #[test]
    fn note_serialization_roundtrip() {
        let note = NoteBuilder::new()
            .id("1")
            .title("Test note")
            .content("Body")
            .created_at(datetime!(2025-01-15 08:30:00 UTC))
            .build();

        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"createdAt\""));

        let deserialized: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(note, deserialized);
    }

    #[test]
    fn new_note_serializes_only_payload_fields() {
        let payload = NewNote::new("Buy milk", "", NoteTag::Shopping);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["content"], "");
        assert_eq!(json["tag"], "Shopping");
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
    }
}
