//! Create-note form: a declarative field schema, local validation, and the
//! TUI form state machine.
//!
//! One schema drives every path that builds a create payload, so the CLI
//! and the interactive form cannot drift apart on field bounds or
//! messages. Validation yields one human-readable message per invalid
//! field, keyed by field name.

use std::collections::BTreeMap;

use crate::api::ApiError;
use crate::models::{NewNote, NoteTag};

/// Minimum title length in characters.
pub const TITLE_MIN: usize = 3;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 50;
/// Maximum content length in characters.
pub const CONTENT_MAX: usize = 500;

/// Generic message shown when a create request fails.
pub const SUBMIT_FAILED: &str = "Failed to create note";

/// One message per invalid field, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Declarative bounds for one text field.
struct FieldRule {
    field: &'static str,
    label: &'static str,
    required: bool,
    min_len: usize,
    max_len: usize,
}

const SCHEMA: [FieldRule; 2] = [
    FieldRule {
        field: "title",
        label: "Title",
        required: true,
        min_len: TITLE_MIN,
        max_len: TITLE_MAX,
    },
    FieldRule {
        field: "content",
        label: "Content",
        required: false,
        min_len: 0,
        max_len: CONTENT_MAX,
    },
];

impl FieldRule {
    /// Checks a value against this rule, returning a message if it fails.
    fn check(&self, value: &str) -> Option<String> {
        let len = value.chars().count();
        if len == 0 {
            return self
                .required
                .then(|| format!("{} is required", self.label));
        }
        if len < self.min_len {
            return Some(format!(
                "{} must be at least {} characters",
                self.label, self.min_len
            ));
        }
        if len > self.max_len {
            return Some(format!(
                "{} must be at most {} characters",
                self.label, self.max_len
            ));
        }
        None
    }
}

/// Raw, unvalidated form values.
///
/// The tag is kept as text so out-of-set input is representable. It is
/// rejected locally, never sent to the service.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl NoteDraft {
    /// Creates a draft from raw field values.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag: tag.into(),
        }
    }

    /// Validates the draft against the field schema.
    ///
    /// Returns the create payload on success, or one message per invalid
    /// field. A draft that fails here never reaches the service.
    pub fn validate(&self) -> Result<NewNote, FieldErrors> {
        let mut errors = FieldErrors::new();

        for rule in &SCHEMA {
            let value = match rule.field {
                "title" => &self.title,
                "content" => &self.content,
                other => unreachable!("unknown schema field: {other}"),
            };
            if let Some(message) = rule.check(value) {
                errors.insert(rule.field.to_string(), message);
            }
        }

        let tag = match self.tag.parse::<NoteTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                let allowed = NoteTag::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                errors.insert(
                    "tag".to_string(),
                    format!("Tag must be one of: {allowed}"),
                );
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let tag = tag.expect("tag parsed when no errors were recorded");
        Ok(NewNote::new(self.title.clone(), self.content.clone(), tag))
    }
}

/// Which form field currently receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
    Tag,
}

/// Submission progress for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    /// Nothing in flight.
    Idle,
    /// A create request is running; submission is disabled.
    Pending,
    /// The last create request failed; values are preserved for retry.
    Failed(String),
}

/// Interactive state for the create-note form.
///
/// Field buffers, field focus, local and server-reported errors, and the
/// submission state machine. Defaults: empty title and content, tag
/// `Todo`, focus on the title.
#[derive(Debug)]
pub struct NoteForm {
    title: String,
    content: String,
    tag: NoteTag,
    focus: FormField,
    errors: FieldErrors,
    server_errors: FieldErrors,
    submit: SubmitState,
}

impl NoteForm {
    /// Creates a form with default values.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default(),
            focus: FormField::Title,
            errors: FieldErrors::new(),
            server_errors: FieldErrors::new(),
            submit: SubmitState::Idle,
        }
    }

    /// Returns the title buffer.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the content buffer.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the selected tag.
    pub fn tag(&self) -> NoteTag {
        self.tag
    }

    /// Returns the focused field.
    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Returns the submission state.
    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// Returns whether a create request is in flight.
    pub fn is_pending(&self) -> bool {
        self.submit == SubmitState::Pending
    }

    /// Returns the message to render next to a field, if any.
    ///
    /// Local validation messages win; otherwise a server-reported message
    /// for the field is shown.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .or_else(|| self.server_errors.get(field))
            .map(String::as_str)
    }

    /// Moves focus to the next field in Tab order.
    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Tag,
            FormField::Tag => FormField::Title,
        };
    }

    /// Moves focus to the previous field in reverse Tab order.
    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Tag,
            FormField::Content => FormField::Title,
            FormField::Tag => FormField::Content,
        };
    }

    /// Appends a character to the focused text field.
    ///
    /// Ignored for the tag selector and while a submission is pending.
    pub fn push_char(&mut self, c: char) {
        if self.is_pending() {
            return;
        }
        match self.focus {
            FormField::Title => self.title.push(c),
            FormField::Content => self.content.push(c),
            FormField::Tag => {}
        }
    }

    /// Removes the last character from the focused text field.
    pub fn pop_char(&mut self) {
        if self.is_pending() {
            return;
        }
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Content => {
                self.content.pop();
            }
            FormField::Tag => {}
        }
    }

    /// Inserts a line break into the content field.
    pub fn insert_newline(&mut self) {
        if !self.is_pending() && self.focus == FormField::Content {
            self.content.push('\n');
        }
    }

    /// Selects the next tag in the fixed set.
    pub fn cycle_tag_next(&mut self) {
        if self.is_pending() {
            return;
        }
        let all = NoteTag::ALL;
        let current = all.iter().position(|t| *t == self.tag).unwrap_or(0);
        self.tag = all[(current + 1) % all.len()];
    }

    /// Selects the previous tag in the fixed set.
    pub fn cycle_tag_prev(&mut self) {
        if self.is_pending() {
            return;
        }
        let all = NoteTag::ALL;
        let current = all.iter().position(|t| *t == self.tag).unwrap_or(0);
        self.tag = all[(current + all.len() - 1) % all.len()];
    }

    /// Validates the form and, on success, transitions to `Pending`.
    ///
    /// Returns the payload to submit, or `None` when validation failed or
    /// a submission is already in flight. Local errors block submission;
    /// nothing is ever sent for an invalid form.
    pub fn begin_submit(&mut self) -> Option<NewNote> {
        if self.is_pending() {
            return None;
        }
        self.server_errors.clear();

        let draft = NoteDraft::new(&self.title, &self.content, self.tag.as_str());
        match draft.validate() {
            Ok(note) => {
                self.errors.clear();
                self.submit = SubmitState::Pending;
                Some(note)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Resets the form to defaults after a successful creation.
    pub fn submit_succeeded(&mut self) {
        *self = Self::new();
    }

    /// Records a failed creation: generic message, values preserved.
    ///
    /// Server-reported field messages, when present, are overlaid next to
    /// the corresponding fields.
    pub fn submit_failed(&mut self, error: &ApiError) {
        if let ApiError::Validation(fields) = error {
            self.server_errors = fields.clone();
        }
        self.fail_generic();
    }

    /// Marks the submission failed with the generic message only.
    pub(crate) fn fail_generic(&mut self) {
        self.submit = SubmitState::Failed(SUBMIT_FAILED.to_string());
    }
}

impl Default for NoteForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> NoteDraft {
        NoteDraft::new("Buy milk", "Two liters", "Shopping")
    }

    #[test]
    fn valid_draft_produces_payload() {
        let note = valid_draft().validate().expect("draft should be valid");
        assert_eq!(note.title(), "Buy milk");
        assert_eq!(note.content(), "Two liters");
        assert_eq!(note.tag(), NoteTag::Shopping);
    }

    #[test]
    fn empty_title_is_required() {
        let errors = NoteDraft::new("", "", "Todo").validate().unwrap_err();
        assert_eq!(errors["title"], "Title is required");
    }

    #[test]
    fn title_bounds_are_inclusive() {
        // 2 characters: too short
        let errors = NoteDraft::new("ab", "", "Todo").validate().unwrap_err();
        assert!(errors["title"].contains("at least 3"));

        // 3 and 50 characters: accepted
        assert!(NoteDraft::new("abc", "", "Todo").validate().is_ok());
        assert!(NoteDraft::new("a".repeat(50), "", "Todo").validate().is_ok());

        // 51 characters: too long
        let errors = NoteDraft::new("a".repeat(51), "", "Todo")
            .validate()
            .unwrap_err();
        assert!(errors["title"].contains("at most 50"));
    }

    #[test]
    fn content_is_optional_but_bounded() {
        assert!(NoteDraft::new("abc", "", "Todo").validate().is_ok());
        assert!(
            NoteDraft::new("abc", "x".repeat(500), "Todo")
                .validate()
                .is_ok()
        );

        let errors = NoteDraft::new("abc", "x".repeat(501), "Todo")
            .validate()
            .unwrap_err();
        assert!(errors["content"].contains("at most 500"));
    }

    #[test]
    fn lengths_are_counted_in_characters_not_bytes() {
        // Three multibyte characters satisfy the three-character minimum
        assert!(NoteDraft::new("äöü", "", "Todo").validate().is_ok());
    }

    #[test]
    fn unknown_tag_is_rejected_locally() {
        let errors = NoteDraft::new("Valid title", "", "Groceries")
            .validate()
            .unwrap_err();
        assert!(errors["tag"].contains("Todo, Work, Personal, Meeting, Shopping"));
    }

    #[test]
    fn every_invalid_field_gets_its_own_message() {
        let errors = NoteDraft::new("ab", "x".repeat(501), "nope")
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("content"));
        assert!(errors.contains_key("tag"));
    }

    // --- NoteForm state machine ---

    #[test]
    fn form_initializes_with_defaults() {
        let form = NoteForm::new();
        assert_eq!(form.title(), "");
        assert_eq!(form.content(), "");
        assert_eq!(form.tag(), NoteTag::Todo);
        assert_eq!(form.focus(), FormField::Title);
        assert_eq!(*form.submit_state(), SubmitState::Idle);
    }

    #[test]
    fn focus_cycles_through_fields() {
        let mut form = NoteForm::new();
        form.next_field();
        assert_eq!(form.focus(), FormField::Content);
        form.next_field();
        assert_eq!(form.focus(), FormField::Tag);
        form.next_field();
        assert_eq!(form.focus(), FormField::Title);

        form.prev_field();
        assert_eq!(form.focus(), FormField::Tag);
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = NoteForm::new();
        form.push_char('h');
        form.push_char('i');
        assert_eq!(form.title(), "hi");

        form.next_field();
        form.push_char('x');
        assert_eq!(form.content(), "x");
        assert_eq!(form.title(), "hi");

        form.pop_char();
        assert_eq!(form.content(), "");
    }

    #[test]
    fn newline_only_lands_in_content() {
        let mut form = NoteForm::new();
        form.insert_newline();
        assert_eq!(form.title(), "");

        form.next_field();
        form.insert_newline();
        assert_eq!(form.content(), "\n");
    }

    #[test]
    fn tag_cycles_wrap_around_the_fixed_set() {
        let mut form = NoteForm::new();
        assert_eq!(form.tag(), NoteTag::Todo);

        form.cycle_tag_prev();
        assert_eq!(form.tag(), NoteTag::Shopping);

        form.cycle_tag_next();
        assert_eq!(form.tag(), NoteTag::Todo);
        form.cycle_tag_next();
        assert_eq!(form.tag(), NoteTag::Work);
    }

    #[test]
    fn begin_submit_blocks_invalid_form() {
        let mut form = NoteForm::new();
        form.push_char('a');

        assert!(form.begin_submit().is_none());
        assert!(form.error_for("title").unwrap().contains("at least 3"));
        assert_eq!(*form.submit_state(), SubmitState::Idle);
    }

    #[test]
    fn begin_submit_transitions_to_pending() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }

        let note = form.begin_submit().expect("form should validate");
        assert_eq!(note.title(), "Standup notes");
        assert!(form.is_pending());

        // A second submit while pending is refused
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn pending_form_ignores_edits() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }
        form.begin_submit().expect("form should validate");

        form.push_char('!');
        form.cycle_tag_next();
        assert_eq!(form.title(), "Standup notes");
        assert_eq!(form.tag(), NoteTag::Todo);
    }

    #[test]
    fn submit_succeeded_resets_to_defaults() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }
        form.cycle_tag_next();
        form.begin_submit();

        form.submit_succeeded();
        assert_eq!(form.title(), "");
        assert_eq!(form.tag(), NoteTag::Todo);
        assert_eq!(*form.submit_state(), SubmitState::Idle);
    }

    #[test]
    fn submit_failed_preserves_values_and_shows_generic_message() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }
        form.begin_submit();

        form.submit_failed(&ApiError::Http { status: 500 });
        assert_eq!(form.title(), "Standup notes");
        assert_eq!(
            *form.submit_state(),
            SubmitState::Failed(SUBMIT_FAILED.to_string())
        );
    }

    #[test]
    fn server_field_errors_overlay_next_to_fields() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }
        form.begin_submit();

        let mut fields = FieldErrors::new();
        fields.insert("title".to_string(), "Title already exists".to_string());
        form.submit_failed(&ApiError::Validation(fields));

        assert_eq!(form.error_for("title"), Some("Title already exists"));
        assert!(matches!(form.submit_state(), SubmitState::Failed(_)));
    }

    #[test]
    fn resubmit_clears_server_errors() {
        let mut form = NoteForm::new();
        for c in "Standup notes".chars() {
            form.push_char(c);
        }
        form.begin_submit();

        let mut fields = FieldErrors::new();
        fields.insert("title".to_string(), "Title already exists".to_string());
        form.submit_failed(&ApiError::Validation(fields));

        form.begin_submit().expect("retry should validate");
        assert_eq!(form.error_for("title"), None);
    }
}
