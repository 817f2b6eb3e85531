//! Error types for URL signing

use thiserror::Error;

/// Result type for signing operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur while minting signed URLs
#[derive(Error, Debug)]
pub enum BucketError {
    /// The S3 presigning primitive failed
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Presigning configuration could not be built (e.g. expiry out of range)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
