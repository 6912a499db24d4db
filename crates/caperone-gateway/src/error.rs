// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error responses returned by the API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use caperone_core::validate::Violation;
use caperone_core::UploadError;

/// Body for every non-validation failure: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body for validation failures: `{"errors": [{"field", "message"}, ...]}`.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: Vec<Violation>,
}

/// Anything a handler can fail with, mapped to a status and JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// One or more fields failed validation (422).
    Validation(Vec<Violation>),
    /// The request body was not valid JSON (400).
    MalformedJson(String),
    /// An upload request carried no `photo` file part (400).
    MissingFile,
    /// The multipart stream could not be read.
    Multipart { status: StatusCode, message: String },
    /// Server-side failure. The message is logged, not returned.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedJson(_) | ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => {
                (status, Json(ValidationResponse { errors })).into_response()
            }
            ApiError::MalformedJson(detail) => {
                tracing::debug!(%detail, "rejected malformed JSON body");
                error_body(status, "Malformed JSON body")
            }
            ApiError::MissingFile => error_body(status, "No file uploaded"),
            ApiError::Multipart { message, .. } => error_body(status, &message),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                error_body(status, "Internal server error")
            }
        }
    }
}

fn error_body(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}
