//! # Backbone Core
//!
//! HTTP building blocks shared by backend services.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The JSON response envelope and its helpers
//! - [`pagination`]: Page-based pagination math
//! - [`serde`]: Lenient deserializers for query strings
//!
//! # Example
//!
//! ```ignore
//! use backbone_core::{AppError, Pagination, respond_pagination};
//!
//! async fn list(Query(mut pagination): Query<Pagination>) -> Result<Response, AppError> {
//!     pagination.paginate();
//!     let rows = repo.list(pagination.limit, pagination.offset).await?;
//!     pagination.set_total(repo.count().await?);
//!     Ok(respond_pagination(StatusCode::OK, rows, &pagination))
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod response;
pub mod serde;

pub use errors::AppError;
pub use pagination::{Pagination, PaginationMeta};
pub use response::{
    ApiResponse, ErrorDetails, PaginatedResult, default_message, please_wait, respond_data,
    respond_data_with_message, respond_error, respond_error_with_message, respond_message,
    respond_message_with_message, respond_pagination,
};
