use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body returned with every rejected issuance request. Internal detail never leaves the server.
pub const GENERIC_ERROR_MESSAGE: &str = "Request could not be processed.";

/// Request for a pair of signed URLs covering one prospective upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlsRequest {
    /// Name of the file as selected on the client, kept as the last key segment
    #[validate(
        length(min = 1, max = 512, message = "invalid_client_filename"),
        custom(function = "validate_client_filename")
    )]
    pub client_filename: String,
    /// Content type the upload will be sent with
    #[validate(length(min = 1, max = 255, message = "invalid_mime_type"))]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlsResponse {
    /// Write-capable URL, bound to the storage key and the declared content type
    pub put_url: String,
    /// Read-capable URL for the same storage key
    pub get_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn generic() -> Self {
        Self {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

// A separator would split the filename across key segments.
fn validate_client_filename(client_filename: &str) -> Result<(), ValidationError> {
    if client_filename.contains(['/', '\\']) {
        return Err(ValidationError::new("invalid_client_filename"));
    }
    Ok(())
}
