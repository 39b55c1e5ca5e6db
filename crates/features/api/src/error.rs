use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crwa_derive::api_model;
use std::borrow::Cow;

/// A specialized [`ApiError`] enum of this crate.
#[crwa_derive::crwa_error]
pub enum ApiError {
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal API error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[api_model]
/// Error payload returned by every API route
pub struct ErrorBody {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable description
    pub message: String,
    /// HTTP status code
    pub status: u16,
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_type().to_owned(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
