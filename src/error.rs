use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::backend::BackendError;
use crate::params::ParamError;
use crate::query::QueryError;

pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
///
/// The two core kinds, `InvalidParameter` and `UnsupportedSyntax`, wrap the
/// validator and compiler rejections and carry their messages through to the
/// client. The remaining variants belong to the HTTP layer. Backend failures
/// deliberately hide their cause behind a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidParameter(#[from] ParamError),

    #[error(transparent)]
    UnsupportedSyntax(#[from] QueryError),

    #[error("No matches found!")]
    NoMatches,

    #[error("Nothing to count")]
    NothingToCount,

    #[error("Not found")]
    NotFound,

    #[error("Check your request and try again")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) | ApiError::UnsupportedSyntax(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoMatches | ApiError::NothingToCount | ApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Backend(_) | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidParameter(_) => "INVALID_PARAMETER",
            ApiError::UnsupportedSyntax(_) => "UNSUPPORTED_SYNTAX",
            ApiError::NoMatches | ApiError::NothingToCount | ApiError::NotFound => "NOT_FOUND",
            ApiError::Backend(_) => "SERVER_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            // The client gets the generic message; the log gets the cause.
            if let ApiError::Backend(source) = &self {
                tracing::error!(error = %source, "backend search failed");
            } else {
                tracing::error!(error = %self, "request failed");
            }
        } else {
            tracing::warn!(error = %message, "request rejected");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
