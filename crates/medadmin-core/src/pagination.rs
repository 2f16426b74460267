//! Pagination utilities for collection endpoints.
//!
//! Collection endpoints are page-based: the client sends `page` (1-indexed)
//! and `limit`, plus any number of named filters, and receives one page of
//! items together with the total number of matching records.
//!
//! # Query encoding
//!
//! - `page`: requested page number (clamped to a minimum of 1)
//! - `limit`: page size (clamped to a minimum of 1)
//! - every non-blank filter, by name
//!
//! Blank filters (empty or whitespace-only) are never sent.
//!
//! # Example
//!
//! ```ignore
//! use medadmin_core::pagination::{PageRequest, PageEnvelope};
//!
//! let request = PageRequest::new(1, 10)
//!     .with_filter("search", "smith")
//!     .with_filter("categoryId", "");
//!
//! // [("page", "1"), ("limit", "10"), ("search", "smith")]
//! let query = request.query_pairs();
//!
//! let envelope: PageEnvelope<Doctor> = response.json().await?;
//! let page = envelope.into_page(&request);
//! println!("{} of {} pages", page.page, page.total_pages());
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::serde::deserialize_optional_count;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Number of pages needed to show `total_count` items, `page_size` at a time.
///
/// Returns 0 when there are no items.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

/// Named filter values sent alongside a page request.
///
/// Values are trimmed on insert; setting a blank value removes the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears a filter. Returns `true` if the stored value changed.
    pub fn set(&mut self, field: impl Into<String>, value: impl AsRef<str>) -> bool {
        let field = field.into();
        let value = value.as_ref().trim();

        if value.is_empty() {
            return self.0.remove(&field).is_some();
        }

        match self.0.get(&field) {
            Some(existing) if existing == value => false,
            _ => {
                self.0.insert(field, value.to_string());
                true
            }
        }
    }

    /// Builder form of [`Filters::set`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Removes every filter. Returns `true` if any were set.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.0.is_empty();
        self.0.clear();
        had_any
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A request for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    filters: Filters,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Creates a request, clamping both `page` and `page_size` to at least 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            filters: Filters::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.filters.set(field, value);
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    pub(crate) fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    /// Query string pairs: `page`, `limit`, then every non-blank filter.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(field, value)| (field.to_string(), value.to_string())),
        );
        pairs
    }
}

/// Mutable cursor over a [`PageRequest`], used by list views that change
/// page, size and filters in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(PageRequest);

impl PageCursor {
    pub fn new(page_size: u32) -> Self {
        Self(PageRequest::new(1, page_size))
    }

    pub fn request(&self) -> &PageRequest {
        &self.0
    }

    pub fn set_page(&mut self, page: u32) {
        self.0.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.0.set_page_size(page_size);
    }

    pub fn filters_mut(&mut self) -> &mut Filters {
        self.0.filters_mut()
    }

    /// Moves the cursor back onto `request`, filters included.
    pub fn reset(&mut self, request: PageRequest) {
        self.0 = request;
    }
}

/// One page of a collection.
///
/// A new result always replaces the previous one; pages are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Total number of matching records across all pages
    pub total_count: u64,
    /// Page number this result was requested for
    pub page: u32,
    /// Page size this result was requested with
    pub page_size: u32,
}

impl<T> PageResult<T> {
    /// `ceil(total_count / page_size)`, 0 when the collection is empty.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Wire shape of a collection response.
///
/// Accepts `{ "items": [...], "total": n }` (also `data` / `totalCount`)
/// or a bare JSON array, whose length is then the total.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageEnvelope<T> {
    Paged {
        #[serde(alias = "data")]
        items: Vec<T>,
        #[serde(
            default,
            alias = "totalCount",
            alias = "total_count",
            deserialize_with = "deserialize_optional_count"
        )]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> PageEnvelope<T> {
    /// Attaches the request's page and size to the decoded items.
    pub fn into_page(self, request: &PageRequest) -> PageResult<T> {
        let (items, total_count) = match self {
            Self::Paged { items, total } => {
                let total = total.unwrap_or(items.len() as u64);
                (items, total)
            }
            Self::Bare(items) => {
                let total = items.len() as u64;
                (items, total)
            }
        };

        PageResult {
            items,
            total_count,
            page: request.page(),
            page_size: request.page_size(),
        }
    }
}
