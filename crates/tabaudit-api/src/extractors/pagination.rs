//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use tabaudit_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    pub page: Option<i64>,
    /// Items per page (default: 25, max: 100).
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let req = PaginationParams::default().into_page_request();
        assert_eq!((req.page, req.per_page), (1, 25));

        let req = PaginationParams {
            page: Some(-3),
            per_page: Some(500),
        }
        .into_page_request();
        assert_eq!((req.page, req.per_page), (1, 100));
    }
}
