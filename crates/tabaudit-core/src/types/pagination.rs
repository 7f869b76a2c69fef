//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl PageRequest {
    /// Create a page request, clamping both values into range.
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Re-clamp values that arrived through deserialization.
    pub fn normalized(self) -> Self {
        Self::new(self.page, self.per_page)
    }

    /// SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.per_page
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: i64,
    /// Number of items per page.
    pub per_page: i64,
    /// Total number of items across all pages.
    pub total: i64,
    /// Total number of pages (at least 1).
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    /// Wrap one page of results.
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let total_pages = if total <= 0 {
            1
        } else {
            (total + request.per_page - 1) / request.per_page
        };
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}
