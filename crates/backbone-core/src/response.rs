//! JSON response envelope.
//!
//! Every response body has the same shape:
//!
//! ```json
//! {
//!   "body": { "...": "..." },
//!   "error": "3f0c2a8e-...",
//!   "message": "Bad Request",
//!   "detail": { "email": "email | required" }
//! }
//! ```
//!
//! Empty members are omitted. `error` carries a fresh id on failures so a
//! client report can be matched with the server log line.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::pagination::Pagination;

/// Default message for a status code, empty when there is none.
pub fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "Success",
        StatusCode::CREATED => "Successfully Inserted Data",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::CONFLICT => "Resource Conflict",
        StatusCode::GONE => "Resource Expired",
        StatusCode::UNPROCESSABLE_ENTITY => "Unprocessable Entity",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        StatusCode::NOT_IMPLEMENTED => "Not Implemented",
        _ => "",
    }
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetails>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            body: None,
            error: None,
            message: None,
            detail: None,
        }
    }
}

impl<T> ApiResponse<T> {
    fn with_message(mut self, message: String) -> Self {
        self.message = Some(message).filter(|m| !m.is_empty());
        self
    }
}

/// Per-field error messages.
///
/// Repeated messages for one field are joined with `" | "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ErrorDetails(BTreeMap<String, String>);

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl AsRef<str>) {
        let entry = self.0.entry(field.into()).or_default();
        if !entry.is_empty() {
            entry.push_str(" | ");
        }
        entry.push_str(message.as_ref());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<String, String>> for ErrorDetails {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A bare message is reported under `error`.
impl From<&str> for ErrorDetails {
    fn from(message: &str) -> Self {
        let mut details = Self::new();
        details.add("error", message);
        details
    }
}

impl From<String> for ErrorDetails {
    fn from(message: String) -> Self {
        Self::from(message.as_str())
    }
}

/// Maps each failing field, lower-cased, to its validation codes.
impl From<&ValidationErrors> for ErrorDetails {
    fn from(errors: &ValidationErrors) -> Self {
        let mut details = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                details.add(field.to_lowercase(), &error.code);
            }
        }
        details
    }
}

fn new_error_id() -> String {
    Uuid::new_v4().to_string()
}

/// Responds with `payload` as the body and the status' default message.
pub fn respond_data<T: Serialize>(status: StatusCode, payload: T) -> Response {
    respond_data_with_message(status, payload, default_message(status))
}

pub fn respond_data_with_message<T: Serialize>(
    status: StatusCode,
    payload: T,
    message: impl Into<String>,
) -> Response {
    let body = ApiResponse {
        body: Some(payload),
        ..ApiResponse::default()
    }
    .with_message(message.into());
    (status, Json(body)).into_response()
}

/// Responds with a message only; non-2xx statuses also get an error id.
pub fn respond_message(status: StatusCode) -> Response {
    respond_message_with_message(status, default_message(status))
}

pub fn respond_message_with_message(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse::<()> {
        error: (!status.is_success()).then(new_error_id),
        ..ApiResponse::default()
    }
    .with_message(message.into());
    (status, Json(body)).into_response()
}

/// Responds with an error id and per-field details.
pub fn respond_error(status: StatusCode, detail: impl Into<ErrorDetails>) -> Response {
    respond_error_with_message(status, detail, default_message(status))
}

pub fn respond_error_with_message(
    status: StatusCode,
    detail: impl Into<ErrorDetails>,
    message: impl Into<String>,
) -> Response {
    let detail = detail.into();
    let body = ApiResponse::<()> {
        error: Some(new_error_id()),
        detail: (!detail.is_empty()).then_some(detail),
        ..ApiResponse::default()
    }
    .with_message(message.into());
    (status, Json(body)).into_response()
}

/// Body of a paginated list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResult<T> {
    pub data: T,
    pub total_data: i64,
    pub page: i64,
    pub total_page: i64,
}

/// Responds with a page of `data`; `pagination` should already hold the total.
pub fn respond_pagination<T: Serialize>(
    status: StatusCode,
    data: T,
    pagination: &Pagination,
) -> Response {
    let result = PaginatedResult {
        data,
        total_data: pagination.total_data,
        page: pagination.page,
        total_page: pagination.total_page,
    };
    respond_data(status, result)
}

/// Rate-limit message telling the client how long to wait.
///
/// `time_passed` and `duration` are in seconds. Within the first minute the
/// remainder of that minute is reported, afterwards the remainder of
/// `duration` in hours and minutes.
///
/// # Example
///
/// ```
/// use backbone_core::response::please_wait;
///
/// assert_eq!(please_wait("", 20, 3600), "Please wait for 40 second(s).");
/// assert_eq!(please_wait("Slow down. ", 600, 7200), "Slow down. Please wait for 1 hour(s) 50 minute(s).");
/// ```
pub fn please_wait(message: &str, time_passed: i64, duration: i64) -> String {
    let mut text = format!("{message}Please wait for");
    if time_passed < 60 {
        text.push_str(&format!(" {} second(s).", 60 - time_passed));
        return text;
    }

    let remaining = duration - time_passed;
    let hours = remaining / 3600;
    let minutes = (remaining - hours * 3600) / 60;

    if hours > 0 {
        text.push_str(&format!(" {hours} hour(s)"));
    }
    text.push_str(&format!(" {minutes} minute(s)."));
    text
}
