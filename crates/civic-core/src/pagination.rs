//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a window of results, expressed as `skip` and `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items to skip.
    pub skip: u64,
    /// Maximum number of items to return.
    pub limit: u64,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: u64 = 100;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u64 = 100;

    /// Creates a new page request, clamping `limit` to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.skip
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A window of results together with the total count across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this window.
    pub items: Vec<T>,
    /// The total number of items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
