//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    /// Clamps the request to sane bounds (page >= 1, 1 <= pageSize <= 100).
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, 100),
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.page_size
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Returns the 1-based absolute row number of the first item on this page.
    #[must_use]
    pub fn first_row(&self) -> u64 {
        self.offset() + 1
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    /// Current page number.
    pub page: u64,
    /// Items per page.
    #[serde(rename = "pageSize")]
    pub page_size: u64,
    /// Whether another page follows this one.
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(request.page_size)
        };

        Self {
            items,
            total,
            total_pages,
            page: request.page,
            page_size: request.page_size,
            has_next_page: request.page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    fn test_offset(#[case] page: u64, #[case] page_size: u64, #[case] expected: u64) {
        let request = PageRequest { page, page_size };
        assert_eq!(request.offset(), expected);
        assert_eq!(request.first_row(), expected + 1);
    }

    #[test]
    fn test_clamped_bounds() {
        let request = PageRequest {
            page: 0,
            page_size: 5000,
        }
        .clamped();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_page_response_totals() {
        let request = PageRequest {
            page: 1,
            page_size: 10,
        };
        let response = PageResponse::new(vec![1, 2, 3], request, 23);
        assert_eq!(response.total_pages, 3);
        assert!(response.has_next_page);

        let last = PageResponse::new(vec![1], PageRequest { page: 3, page_size: 10 }, 23);
        assert!(!last.has_next_page);
    }

    #[test]
    fn test_empty_result_is_one_page() {
        let response = PageResponse::<u8>::new(vec![], PageRequest::default(), 0);
        assert_eq!(response.total_pages, 1);
        assert!(!response.has_next_page);
    }
}
