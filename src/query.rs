//! List-query parameters and the matching response page.
//!
//! A `NoteListQuery` is both the request description and the cache key:
//! two queries with equal fields are the same request, and the data-fetch
//! coordinator stores results keyed by the full tuple.

use serde::{Deserialize, Serialize};

use crate::models::{Note, TagFilter};

/// Notes per page. The service paginates with a fixed page size.
pub const PER_PAGE: u32 = 9;

/// Identifies one distinct list request: `(search, page, tag)` plus the
/// fixed page size.
///
/// Equality and hashing cover every field, so the query doubles as the
/// cache key for fetched pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteListQuery {
    page: u32,
    per_page: u32,
    search: String,
    tag: TagFilter,
}

impl NoteListQuery {
    /// Creates a query for the given search text, page, and tag filter.
    ///
    /// The page number is clamped to at least 1.
    pub fn new(search: impl Into<String>, page: u32, tag: TagFilter) -> Self {
        Self {
            page: page.max(1),
            per_page: PER_PAGE,
            search: search.into(),
            tag,
        }
    }

    /// The first, unsearched page for a tag filter; what a fresh view asks for.
    pub fn first_page(tag: TagFilter) -> Self {
        Self::new("", 1, tag)
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the committed search text (possibly empty).
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the tag filter.
    pub fn tag(&self) -> TagFilter {
        self.tag
    }

    /// Renders the query as HTTP parameters.
    ///
    /// `search` is always present (possibly empty, matching what the
    /// service expects); `tag` is omitted entirely for `TagFilter::All`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
            ("search", self.search.clone()),
        ];
        if let Some(tag) = self.tag.as_param() {
            params.push(("tag", tag.to_string()));
        }
        params
    }
}

/// One page of list results returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListPage {
    /// Notes on this page, in service order.
    pub notes: Vec<Note>,
    /// Total number of pages for the query.
    pub total_pages: u32,
}
