use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::response::{ApiResponse, ErrorDetails, default_message};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub detail: Option<ErrorDetails>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            detail: None,
        }
    }

    /// Attaches per-field details, replacing the error text in the response.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<ErrorDetails>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// Validation failure (422) with one detail entry per failing field.
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        let detail = ErrorDetails::from(&errors);
        Self::unprocessable(errors).with_detail(detail)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();

        if self.status.is_server_error() {
            error!(error_id = %error_id, status = self.status.as_u16(), error = ?self.error, "Request failed");
        } else {
            warn!(error_id = %error_id, status = self.status.as_u16(), error = %self.error, "Request rejected");
        }

        // Internal failures never leak their cause to the client.
        let detail = match self.detail {
            Some(detail) => Some(detail),
            None if self.status.is_server_error() => None,
            None => Some(ErrorDetails::from(self.error.to_string())),
        };

        let message = default_message(self.status);
        let body = ApiResponse::<()> {
            body: None,
            error: Some(error_id),
            message: (!message.is_empty()).then(|| message.to_string()),
            detail,
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
