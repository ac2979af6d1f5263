/// Notes service HTTP client.
pub mod client;

pub use client::{ApiError, NotesApi, NotesClient, NotesClientBuilder};
