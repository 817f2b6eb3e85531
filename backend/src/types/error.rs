//! Error responses for the issuance endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::{ErrorResponse, GENERIC_ERROR_MESSAGE};

use crate::{issuance::IssuanceError, media_storage::BucketError};

/// Application error type rendered as `{ "message": ... }`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// HTTP status of the error response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                message: self.message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Every issuance failure is a 400 with the same body; the detail stays in the logs
impl From<IssuanceError> for AppError {
    #[allow(clippy::cognitive_complexity)]
    fn from(err: IssuanceError) -> Self {
        match &err {
            IssuanceError::MalformedRequest(msg) => {
                tracing::warn!("Malformed issuance request: {msg}");
            }
            IssuanceError::InvalidRequest(errors) => {
                tracing::warn!("Issuance request failed validation: {errors}");
            }
            IssuanceError::Signing(BucketError::SigningError(msg)) => {
                tracing::error!("URL signing error: {msg}");
            }
            IssuanceError::Signing(BucketError::ConfigError(msg)) => {
                tracing::error!("Presigning configuration error: {msg}");
            }
        }

        Self::new(StatusCode::BAD_REQUEST, GENERIC_ERROR_MESSAGE)
    }
}
