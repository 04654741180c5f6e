//! Public API types

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

pub use crate::schedule::FieldError;
use crate::schedule::ScheduleError;

// Errors

/// Body of every failed response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<FieldError>,
    execution_id: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, errors: Vec<FieldError>) -> Self {
        Self {
            status,
            errors,
            execution_id: None,
        }
    }

    pub fn general(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, vec![FieldError::general(message)])
    }

    pub fn method_not_allowed(allowed: &str) -> Self {
        Self::general(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method not allowed. Use {}.", allowed),
        )
    }

    pub fn internal() -> Self {
        Self::general(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, errors = ?self.errors, "Request failed");
        } else {
            tracing::warn!(status = %self.status, errors = ?self.errors, "Request rejected");
        }

        (
            self.status,
            Json(ErrorResponse {
                errors: self.errors,
                execution_id: self.execution_id,
            }),
        )
            .into_response()
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        Self {
            status: err.status(),
            errors: err.field_errors(),
            execution_id: err.execution_id().map(str::to_string),
        }
    }
}

/// Body extraction failures, e.g. a body over the size limit, keep
/// their status and are rendered as a `general` error.
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::general(rejection.status(), rejection.body_text())
    }
}

// Re-export public types from each route

pub mod config {
    pub use crate::api::routes::config::public::*;
}

pub mod schedule {
    pub use crate::api::routes::schedule::public::*;
}
