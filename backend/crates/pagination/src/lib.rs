//! Page-number pagination primitives shared by directory endpoints.
//!
//! Purpose: one definition of the pagination contract — the 1-based
//! [`PageRequest`], the [`PageMeta`] summary, and the [`Page`] envelope —
//! used by both the HTTP surface and the client cache so the two sides
//! cannot drift.
//!
//! Wire shape (camelCase JSON):
//! `{"data": [...], "meta": {"page", "limit", "total", "totalPages"}}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page when the request omits one.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the request omits one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Validation errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-based; zero is not addressable.
    #[error("page must be a positive integer")]
    PageOutOfRange,
    /// A zero limit would make every page empty and `totalPages` undefined.
    #[error("limit must be a positive integer")]
    LimitOutOfRange,
}

/// A validated, 1-based page window request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Construct a request, rejecting zero values.
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when `page` or `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 {
            return Err(PageRequestError::LimitOutOfRange);
        }
        Ok(Self { page, limit })
    }

    /// Construct a request from optional components, applying the
    /// 1/10 defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when a provided value is zero.
    pub const fn from_optional(
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        let page = match page {
            Some(value) => value,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        Self::new(page, limit)
    }

    /// Requested page, 1-based.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the window starts.
    #[must_use]
    pub const fn skip(self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Pagination summary attached to every [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Page that was served, 1-based.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Rows matching the filter predicate, ignoring the window.
    pub total: u64,
    /// `ceil(total / limit)`; zero when nothing matches.
    pub total_pages: u64,
}

impl PageMeta {
    /// Derive the metadata for a request against `total` matching rows.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(request.limit as u64)
        };
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
        }
    }
}

/// The combined `{data, meta}` envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows for the requested window, already ordered.
    pub data: Vec<T>,
    /// Pagination summary for the filter that produced `data`.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Assemble an envelope from a window of rows and its request context.
    #[must_use]
    pub const fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }
}
