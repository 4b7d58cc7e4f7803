//! REST-facing error type and the mapping from domain errors.

use axum::http::StatusCode;
use thiserror::Error;

use crate::service::ServiceError;

/// An error surfaced to API callers: HTTP status plus a machine-readable code
/// and a human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}: {message} - {code}")]
pub struct RestError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "ERR_BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn invalid_access_token() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "ERR_INVALID_ACCESS_TOKEN",
            message: "invalid access token".into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "ERR_FORBIDDEN_ACCESS",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "ERR_NOT_FOUND",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "ERR_INTERNAL_ERROR",
            message: message.into(),
        }
    }
}

impl From<ServiceError> for RestError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::WrongEntity => RestError::bad_request(err.to_string()),
        }
    }
}
