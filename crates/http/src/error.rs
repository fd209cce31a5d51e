//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Body status for client errors
pub const STATUS_FAIL: &str = "fail";
/// Body status for server errors
pub const STATUS_ERROR: &str = "error";

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// The client sent something we refuse; answered with a 4xx and `"fail"`.
    #[error("fail ({status}): {message}")]
    Fail { status: StatusCode, message: String },

    /// We could not complete the request; answered with a 500 and `"error"`.
    #[error("error: {message}")]
    Error { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a 400 failure
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Fail {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Create a 404 failure
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Fail {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Create a 500 error with a message safe to show to clients
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// HTTP status this error is answered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fail { status, .. } => *status,
            AppError::Error { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status_code();

        let body = match self {
            AppError::Fail { message, .. } => {
                tracing::warn!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    message = %message,
                    "request failed"
                );
                ErrorBody {
                    status: STATUS_FAIL,
                    message,
                }
            }
            AppError::Error { message } => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    message = %message,
                    "request error"
                );
                ErrorBody {
                    status: STATUS_ERROR,
                    message,
                }
            }
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "internal error"
                );
                // In production, we hide internal error details
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                ErrorBody {
                    status: STATUS_ERROR,
                    message,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
