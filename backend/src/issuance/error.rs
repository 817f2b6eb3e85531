use thiserror::Error;
use validator::ValidationErrors;

use crate::media_storage::BucketError;

/// Reasons an issuance request is rejected
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// Body could not be decoded or parsed
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Body parsed but failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    /// The signing primitive failed
    #[error(transparent)]
    Signing(#[from] BucketError),
}

impl From<serde_json::Error> for IssuanceError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedRequest(format!("Invalid JSON body: {error}"))
    }
}

impl From<base64::DecodeError> for IssuanceError {
    fn from(error: base64::DecodeError) -> Self {
        Self::MalformedRequest(format!("Invalid base64 body: {error}"))
    }
}
