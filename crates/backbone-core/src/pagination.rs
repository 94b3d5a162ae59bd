//! Page-based pagination.
//!
//! [`Pagination`] is read from the query string (`?limit=20&page=3`),
//! normalized with [`Pagination::paginate`] before querying and completed
//! with [`Pagination::set_total`] once the total row count is known.
//!
//! # Example
//!
//! ```ignore
//! async fn list_posts(
//!     Query(mut pagination): Query<Pagination>,
//! ) -> Result<Response, AppError> {
//!     pagination.paginate();
//!     let posts = fetch_posts(pagination.limit, pagination.offset).await?;
//!     pagination.set_total(count_posts().await?);
//!
//!     Ok(respond_pagination(StatusCode::OK, posts, &pagination))
//! }
//! ```

use backbone_cache::{CacheKey, Fields};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde::deserialize_lenient_i64;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAXIMUM_LIMIT: i64 = 100;

/// Pagination state of a list request.
///
/// Only `limit` and `page` come from the client; the remaining fields are
/// computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub limit: i64,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: i64,
    #[serde(skip_deserializing)]
    pub offset: i64,
    #[serde(skip_deserializing)]
    pub total_page: i64,
    #[serde(skip_deserializing)]
    pub total_data: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            limit,
            page,
            ..Self::default()
        }
    }

    /// Resets page and limit to their defaults.
    pub fn set_to_default(&mut self) {
        self.page = DEFAULT_PAGE;
        self.limit = DEFAULT_LIMIT;
    }

    /// Falls back to defaults when page or limit is below 1 and caps the limit.
    pub fn validate(&mut self) {
        if self.page < 1 || self.limit < 1 {
            self.set_to_default();
        }
        if self.limit > MAXIMUM_LIMIT {
            self.limit = MAXIMUM_LIMIT;
        }
    }

    /// Validates and computes the row offset of the requested page.
    pub fn paginate(&mut self) {
        self.validate();
        self.offset = self.limit.saturating_mul(self.page - 1);
    }

    /// Records the total row count and derives the page count.
    ///
    /// A total smaller than one page shrinks the limit to the total.
    pub fn set_total(&mut self, total_data: i64) {
        self.total_data = total_data;
        self.validate();
        if self.total_data > 0 && self.total_data < self.limit {
            self.limit = self.total_data;
        }
        self.total_page = if self.total_data > 0 {
            (self.total_data - 1) / self.limit + 1
        } else {
            0
        };
    }

    #[must_use]
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            total: self.total_data,
            limit: self.limit,
            page: self.page,
            total_page: self.total_page,
            has_more: self.page < self.total_page,
        }
    }
}

/// List caches dive into the pagination so each page gets its own key.
impl CacheKey for Pagination {
    fn type_name(&self) -> &str {
        "Pagination"
    }

    fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.value("Limit", &self.limit).cache("optional");
        fields.value("Page", &self.page).cache("optional");
        fields.value("Offset", &self.offset);
        fields.value("TotalPage", &self.total_page);
        fields.value("TotalData", &self.total_data);
    }
}

/// Metadata about a paginated response.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "total": 100,
///   "limit": 10,
///   "page": 3,
///   "total_page": 10,
///   "has_more": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Items per page (the limit that was applied)
    pub limit: i64,
    /// Current page number
    pub page: i64,
    /// Number of pages
    pub total_page: i64,
    /// Whether there are more pages after this one
    pub has_more: bool,
}
