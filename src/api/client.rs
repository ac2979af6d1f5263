/// Notes service HTTP client implementation.
///
/// This module provides `NotesClient` for making synchronous HTTP requests to
/// the remote notes service, along with error types and a builder pattern for
/// configuration.
use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{NewNote, Note};
use crate::query::{NoteListPage, NoteListQuery};

/// Errors that can occur when talking to the notes service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The service rejected a create request, reporting per-field messages
    #[error("Validation rejected by service")]
    Validation(BTreeMap<String, String>),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Builder for constructing `NotesClient` instances.
///
/// # Examples
///
/// ```
/// use nota::api::NotesClientBuilder;
///
/// let client = NotesClientBuilder::new()
///     .base_url("http://localhost:3000/api")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct NotesClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
}

impl NotesClientBuilder {
    /// Creates a new `NotesClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the notes service.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL (e.g., "http://localhost:3000/api")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds the `NotesClient` with the configured settings.
    ///
    /// If `base_url()` was not called, this method checks the `NOTA_API_URL`
    /// environment variable, then falls back to `http://localhost:3000/api`.
    /// If `token()` was not called, `NOTA_API_TOKEN` is consulted; with
    /// neither set, requests carry no Authorization header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL does not parse, or
    /// `ApiError::Network` if the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<NotesClient, ApiError> {
        // Builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("NOTA_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string())
        };

        let token = if self.token.is_some() {
            self.token
        } else {
            std::env::var("NOTA_API_TOKEN").ok()
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ApiError::Network)?;

        Ok(NotesClient {
            client,
            base_url,
            token,
        })
    }
}

/// Trait for notes service operations.
///
/// This trait enables mocking in unit tests and gives the data-fetch
/// coordinator a seam that does not depend on a live service.
pub trait NotesApi: Send + Sync {
    /// Fetches one page of notes matching the query.
    fn fetch_notes(&self, query: &NoteListQuery) -> Result<NoteListPage, ApiError>;

    /// Creates a note and returns the service's view of it.
    fn create_note(&self, note: &NewNote) -> Result<Note, ApiError>;
}

/// Synchronous HTTP client for the remote notes service.
///
/// Construct it with `NotesClientBuilder`. There is no automatic retry:
/// every failure is surfaced to the caller, and retrying is an explicit
/// user action.
pub struct NotesClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

/// Shape of a 400 response carrying per-field messages.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: BTreeMap<String, String>,
}

impl NotesClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, builder: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Maps a transport error to the matching `ApiError` variant.
fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(error)
    } else {
        ApiError::Network(error)
    }
}

impl NotesApi for NotesClient {
    fn fetch_notes(&self, query: &NoteListQuery) -> Result<NoteListPage, ApiError> {
        let url = format!("{}/notes", self.base_url);
        debug!(
            page = query.page(),
            search = query.search(),
            tag = %query.tag(),
            "fetching notes"
        );

        let response = self
            .request(self.client.get(&url).query(&query.params()))
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport_error)?;
        serde_json::from_str(&body).map_err(ApiError::Serialization)
    }

    fn create_note(&self, note: &NewNote) -> Result<Note, ApiError> {
        let url = format!("{}/notes", self.base_url);
        debug!(title = note.title(), tag = %note.tag(), "creating note");

        let response = self
            .request(self.client.post(&url).json(note))
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            // A 400 may carry per-field messages; anything else stays a
            // plain HTTP error.
            let body = response.text().map_err(transport_error)?;
            if let Ok(rejection) = serde_json::from_str::<ValidationBody>(&body)
                && !rejection.errors.is_empty()
            {
                return Err(ApiError::Validation(rejection.errors));
            }
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport_error)?;
        serde_json::from_str(&body).map_err(ApiError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::error::Error;

    #[test]
    fn http_error_variant_with_status_code() {
        let error = ApiError::Http { status: 404 };

        let message = format!("{}", error);
        assert!(message.contains("HTTP error"));
        assert!(message.contains("404"));
    }

    #[test]
    fn serialization_error_variant_wraps_serde_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = ApiError::Serialization(json_error);

        let message = format!("{}", error);
        assert!(message.contains("Serialization error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn validation_variant_carries_field_messages() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "Title is too short".to_string());
        let error = ApiError::Validation(fields);

        if let ApiError::Validation(map) = &error {
            assert_eq!(map["title"], "Title is too short");
        } else {
            panic!("Expected Validation variant");
        }
    }

    #[test]
    fn builder_new_creates_builder_with_defaults() {
        let builder = NotesClientBuilder::new();
        assert!(builder.base_url.is_none());
        assert!(builder.token.is_none());
    }

    #[test]
    fn base_url_method_sets_custom_url() {
        let builder = NotesClientBuilder::new().base_url("http://example.com/api");
        assert_eq!(builder.base_url, Some("http://example.com/api".to_string()));
    }

    #[test]
    #[serial]
    fn build_uses_default_url_when_base_url_not_called() {
        unsafe {
            std::env::remove_var("NOTA_API_URL");
        }

        let client = NotesClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    #[serial]
    fn build_reads_environment_variables_if_set() {
        unsafe {
            std::env::set_var("NOTA_API_URL", "http://notes.example.com/api");
            std::env::set_var("NOTA_API_TOKEN", "secret-token");
        }

        let client = NotesClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "http://notes.example.com/api");
        assert_eq!(client.token(), Some("secret-token"));

        unsafe {
            std::env::remove_var("NOTA_API_URL");
            std::env::remove_var("NOTA_API_TOKEN");
        }
    }

    #[test]
    #[serial]
    fn builder_values_take_precedence_over_environment() {
        unsafe {
            std::env::set_var("NOTA_API_URL", "http://env-host/api");
        }

        let client = NotesClientBuilder::new()
            .base_url("http://builder-host/api")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://builder-host/api");

        unsafe {
            std::env::remove_var("NOTA_API_URL");
        }
    }

    #[test]
    #[serial]
    fn build_without_token_leaves_requests_anonymous() {
        unsafe {
            std::env::remove_var("NOTA_API_TOKEN");
        }

        let client = NotesClientBuilder::new()
            .base_url("http://localhost:3000/api")
            .build()
            .unwrap();
        assert_eq!(client.token(), None);
    }

    #[test]
    fn build_returns_error_if_invalid_url_provided() {
        let result = NotesClientBuilder::new().base_url("not-a-valid-url").build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn validation_body_parses_field_error_map() {
        let body = r#"{"errors": {"title": "Title is too short", "tag": "Unknown tag"}}"#;
        let parsed: ValidationBody = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors["title"], "Title is too short");
    }

    #[test]
    fn trait_can_be_implemented_by_mock_struct() {
        use crate::models::{NoteBuilder, TagFilter};

        struct MockApi;

        impl NotesApi for MockApi {
            fn fetch_notes(&self, _query: &NoteListQuery) -> Result<NoteListPage, ApiError> {
                Ok(NoteListPage {
                    notes: vec![],
                    total_pages: 1,
                })
            }

            fn create_note(&self, note: &NewNote) -> Result<Note, ApiError> {
                Ok(NoteBuilder::new()
                    .id("1")
                    .title(note.title())
                    .content(note.content())
                    .tag(note.tag())
                    .build())
            }
        }

        let mock = MockApi;
        let page = mock
            .fetch_notes(&NoteListQuery::first_page(TagFilter::All))
            .unwrap();
        assert_eq!(page.total_pages, 1);
    }
}
