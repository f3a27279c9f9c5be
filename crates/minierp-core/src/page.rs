//! # Pagination Types
//!
//! Request/response types for paginated listings.
//!
//! Pages are 1-based on the wire. Repositories translate a [`PageRequest`]
//! into an OFFSET/LIMIT pair and run a separate COUNT query; services wrap
//! the rows in a [`PageResponse`].

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard cap on page size.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Page Request
// =============================================================================

/// A page request as it arrives from the query string.
///
/// Out-of-range values are clamped rather than rejected: page 0 becomes
/// page 1, size 0 becomes the default, size above the cap becomes the cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of rows per page.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest { page, size }
    }

    /// The page number after clamping.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// The page size after clamping.
    pub fn size(&self) -> u32 {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size.min(MAX_PAGE_SIZE)
        }
    }

    /// Row offset for the SQL query.
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.size())
    }

    /// Row limit for the SQL query.
    pub fn limit(&self) -> i64 {
        i64::from(self.size())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// Page Response
// =============================================================================

/// Pagination metadata returned alongside the rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    /// Page size used for the query.
    pub size: u32,
    /// Total rows matching the filter.
    pub total_elements: i64,
    /// Total pages at this size.
    pub total_pages: u32,
    /// Whether this is the first page.
    pub first: bool,
    /// Whether this is the last page.
    pub last: bool,
}

/// A page of rows plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> PageResponse<T> {
    /// Builds a page from the fetched rows and the total count.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let size = request.size();
        let page = request.page();
        let total_pages = if total_elements == 0 {
            0
        } else {
            ((total_elements + i64::from(size) - 1) / i64::from(size)) as u32
        };

        PageResponse {
            content,
            page_info: PageInfo {
                page,
                size,
                total_elements,
                total_pages,
                first: page == 1,
                last: total_pages == 0 || page >= total_pages,
            },
        }
    }

    /// Maps the row type while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.size(), DEFAULT_PAGE_SIZE);

        let req = PageRequest::new(2, 1000);
        assert_eq!(req.size(), MAX_PAGE_SIZE);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_page_math() {
        let page = PageResponse::new(vec![1, 2, 3], PageRequest::new(1, 3), 7);
        assert_eq!(page.page_info.total_pages, 3);
        assert!(page.page_info.first);
        assert!(!page.page_info.last);

        let page = PageResponse::new(vec![7], PageRequest::new(3, 3), 7);
        assert!(page.page_info.last);
    }

    #[test]
    fn test_empty_result() {
        let page: PageResponse<i64> = PageResponse::new(vec![], PageRequest::default(), 0);
        assert_eq!(page.page_info.total_pages, 0);
        assert!(page.page_info.first);
        assert!(page.page_info.last);
    }
}
