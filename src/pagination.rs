//! Page requests and paged results for list queries.

use serde::{Deserialize, Serialize};

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: u32,
    page_size: u32,
}

impl Pagination {
    /// Page size used when the caller does not choose one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Largest page size a caller may request.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a page request.
    ///
    /// Page numbers below 1 are raised to 1 and page sizes are clamped to
    /// `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    /// Requests the given page with the default page size.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self::new(page, Self::DEFAULT_PAGE_SIZE)
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Returns the maximum number of rows to return.
    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(1)
    }
}

/// One page of results together with the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on the requested page.
    pub results: Vec<T>,
    /// Number of matching items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Slices an in-memory, already ordered result set into a page.
    #[must_use]
    pub fn from_ordered(items: Vec<T>, pagination: Pagination) -> Self {
        let total = items.len() as u64;
        let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let results = items.into_iter().skip(skip).take(take).collect();
        Self { results, total }
    }
}
