pub mod api;
pub mod debounce;
pub mod form;
pub mod models;
pub mod query;
pub mod store;
pub mod tui;

pub use api::{ApiError, NotesApi, NotesClient, NotesClientBuilder};
pub use debounce::Debouncer;
pub use form::{NoteDraft, NoteForm, SubmitState};
pub use models::{NewNote, Note, NoteBuilder, NoteTag, TagFilter};
pub use query::{NoteListPage, NoteListQuery, PER_PAGE};
pub use store::{NoteStore, QueryState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let tag: NoteTag = "Work".parse().unwrap();
        assert_eq!(tag, NoteTag::Work);

        let query = NoteListQuery::first_page(TagFilter::All);
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), PER_PAGE);

        let note = NoteBuilder::new().id("1").title("test").build();
        assert_eq!(note.title, "test");
    }

    #[test]
    fn client_builder_accessible_from_crate_root() {
        let client = NotesClientBuilder::new()
            .base_url("http://localhost:3000/api")
            .build();
        assert!(client.is_ok());
    }
}
